use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{prelude::*, widgets::*};
use throbber_widgets_tui::{Throbber, ThrobberState, WhichUse, BRAILLE_SIX};
use tokio::sync::mpsc::UnboundedSender;
use uploadtui::model::action::Action;
use uploadtui::model::resource_preview::ResourcePreview;
use uploadtui::model::state::{ActivePage, State};
use uploadtui::model::upload_screen::{UploadScreen, UploadStatus};
use uploadtui::utils::format_percent;
use crate::components::component::{Component, ComponentRender};
use crate::components::widgets::quit_confirmation::QuitConfirmation;

const FOCUS_COLOR: Color = Color::Rgb(98, 114, 164);

#[derive(Clone)]
struct Props {
    upload: UploadScreen,
    resource: Option<ResourcePreview>,
    resource_error: Option<String>,
    destination: String,
}

impl From<&State> for Props {
    fn from(state: &State) -> Self {
        let st = state.clone();
        Props {
            upload: st.upload,
            resource: st.resource,
            resource_error: st.resource_error,
            destination: st.destination,
        }
    }
}

/// The upload screen: resource panel, upload button, spinner, progress bar and status label
pub struct UploadPage {
    pub action_tx: UnboundedSender<Action>,
    props: Props,
    throbber_state: ThrobberState,
    show_quit_confirmation: bool,
}

impl Component for UploadPage {
    fn new(state: &State, action_tx: UnboundedSender<Action>) -> Self
        where
            Self: Sized,
    {
        UploadPage {
            action_tx: action_tx.clone(),
            props: Props::from(state),
            throbber_state: ThrobberState::default(),
            show_quit_confirmation: false,
        }
            .move_with_state(state)
    }

    fn move_with_state(self, state: &State) -> Self
        where
            Self: Sized,
    {
        UploadPage {
            props: Props::from(state),
            ..self
        }
    }

    fn name(&self) -> &str {
        "Upload"
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if self.show_quit_confirmation {
            match QuitConfirmation::handle_key_event(key) {
                Some(true) => {
                    let _ = self.action_tx.send(Action::Exit);
                }
                Some(false) => self.show_quit_confirmation = false,
                None => {}
            }
            return;
        }

        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Enter | KeyCode::Char('u') => {
                if self.props.upload.button_enabled() {
                    let _ = self.action_tx.send(Action::TriggerUpload);
                }
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                let _ = self.action_tx.send(Action::Exit);
            }
            KeyCode::Char('q') => {
                if self.props.upload.is_uploading() {
                    self.show_quit_confirmation = true;
                } else {
                    let _ = self.action_tx.send(Action::Exit);
                }
            }
            KeyCode::Char('?') if !self.props.upload.is_uploading() => {
                let _ = self.action_tx.send(Action::Navigate { page: ActivePage::Help });
            }
            _ => {}
        }
    }

    fn tick(&mut self) {
        if self.props.upload.indicators_visible() {
            self.throbber_state.calc_next();
        }
    }
}

impl UploadPage {
    fn get_resource_panel(&self) -> Paragraph {
        let block = Block::default().borders(Borders::ALL).title("Resource").fg(Color::White);
        let lines: Vec<Line> = match (&self.props.resource, &self.props.resource_error) {
            (Some(resource), _) => {
                let mut lines: Vec<Line> = resource
                    .to_lines()
                    .into_iter()
                    .map(|(label, value)| {
                        Line::from(vec![
                            Span::styled(format!("{:<6}", label), Style::default().fg(FOCUS_COLOR).bold()),
                            Span::raw(value),
                        ])
                    })
                    .collect();
                if resource.is_image() {
                    lines.push(Line::from(Span::styled("[image]", Style::new().green().italic())));
                }
                lines
            }
            (None, Some(error)) => vec![Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red)))],
            (None, None) => vec![Line::from("Loading resource…")],
        };
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true })
    }

    fn get_button(&self) -> Paragraph {
        let style = if self.props.upload.button_enabled() {
            Style::default().fg(Color::Black).bg(Color::Green).bold()
        } else {
            Style::default().fg(Color::DarkGray).bg(Color::Black)
        };
        Paragraph::new(" Upload ")
            .style(style)
            .alignment(Alignment::Center)
    }

    fn get_throbber(&self) -> Throbber {
        Throbber::default()
            .label(self.props.upload.status_text())
            .style(Style::default().fg(Color::Cyan))
            .throbber_set(BRAILLE_SIX)
            .use_type(WhichUse::Spin)
    }

    fn get_progress(&self) -> Gauge {
        let progress = self.props.upload.progress();
        Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Progress"))
            .gauge_style(Style::default().fg(FOCUS_COLOR).bg(Color::Black))
            .ratio(progress)
            .label(format_percent(progress))
    }

    fn get_status_label(&self) -> Paragraph {
        let color = match self.props.upload.status() {
            UploadStatus::Idle => Color::White,
            UploadStatus::Uploading => Color::Cyan,
            UploadStatus::Succeeded => Color::Green,
            UploadStatus::Failed(_) => Color::Red,
        };
        let mut lines = vec![Line::from(Span::styled(
            self.props.upload.status_text(),
            Style::default().fg(color).bold(),
        ))];
        if let (UploadStatus::Succeeded, Some(response)) = (self.props.upload.status(), self.props.upload.last_response()) {
            lines.push(Line::from(format!("HTTP {}", response.status)));
        }
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Status"))
    }
}

impl ComponentRender<()> for UploadPage {
    fn render(&self, frame: &mut Frame, _props: ()) {
        let chunks = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(6),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(frame.area());

        let destination = Line::from(vec![
            Span::raw("Destination: "),
            Span::styled(self.props.destination.clone(), Style::default().fg(FOCUS_COLOR)),
        ]);
        frame.render_widget(Paragraph::new(destination), chunks[0]);
        frame.render_widget(self.get_resource_panel(), chunks[1]);

        let button_area = Layout::horizontal([Constraint::Length(12), Constraint::Min(0)]).split(chunks[2])[0];
        frame.render_widget(self.get_button(), button_area);

        if self.props.upload.indicators_visible() {
            frame.render_stateful_widget(self.get_throbber(), chunks[3], &mut self.throbber_state.clone());
            frame.render_widget(self.get_progress(), chunks[4]);
        }
        frame.render_widget(self.get_status_label(), chunks[5]);

        let help = Paragraph::new("Enter/u upload  ? help  q quit").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[6]);

        if self.show_quit_confirmation {
            QuitConfirmation::render(frame);
        }
    }
}
