use std::path::PathBuf;

use clap::Parser;

use uploadtui::utils::version;

#[derive(Parser, Debug)]
#[command(author, version = version(), about)]
pub struct Cli {
    /// Local file to upload, overrides `resource_path` from the configuration
    #[arg(short, long, value_name = "PATH")]
    pub resource: Option<PathBuf>,

    /// URL receiving the multipart POST, overrides `destination_url`
    #[arg(short, long, value_name = "URL")]
    pub destination: Option<String>,

    /// Configuration file to use instead of config.toml in the config directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overrides() {
        let cli = Cli::parse_from(["uploadtui", "-r", "cat.png", "--destination", "http://h/u"]);
        assert_eq!(cli.resource, Some(PathBuf::from("cat.png")));
        assert_eq!(cli.destination.as_deref(), Some("http://h/u"));
        assert!(cli.config.is_none());
    }
}
