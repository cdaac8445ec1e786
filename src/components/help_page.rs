use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc::UnboundedSender;
use uploadtui::model::action::Action;
use uploadtui::model::state::{ActivePage, State};
use crate::components::component::{Component, ComponentRender};

struct Props {
    commands: Vec<(String, String)>,  // command and its description
    destination: String,
    list_state: ListState,
}

impl From<&State> for Props {
    fn from(state: &State) -> Self {
        Props {
            commands: vec![
                ("Enter / u".to_string(), "upload the resource".to_string()),
                ("?".to_string(), "this help page, unavailable while uploading".to_string()),
                ("Esc".to_string(), "move back to the upload screen, starting it afresh".to_string()),
                ("↕ / j / k".to_string(), "move up/down on this list".to_string()),
                ("q".to_string(), "quit the application".to_string()),
                ("Ctrl-C".to_string(), "quit without confirmation".to_string()),
            ],
            destination: state.destination.clone(),
            list_state: ListState::default(),
        }
    }
}

pub struct HelpPage {
    pub action_tx: UnboundedSender<Action>,
    props: Props,
}

impl HelpPage {
    pub fn navigate(&mut self, up: bool) {
        let i = match self.props.list_state.selected() {
            Some(i) => {
                if up {
                    i.saturating_sub(1)
                } else {
                    i.saturating_add(1).min(self.props.commands.len().saturating_sub(1))
                }
            }
            None => 0,
        };
        self.props.list_state.select(Some(i));
    }
}

impl Component for HelpPage {
    fn new(state: &State, action_tx: UnboundedSender<Action>) -> Self
        where
            Self: Sized,
    {
        HelpPage {
            action_tx: action_tx.clone(),
            // set the props
            props: Props::from(state),
        }
            .move_with_state(state)
    }

    fn move_with_state(self, state: &State) -> Self
        where
            Self: Sized,
    {
        let list_state = self.props.list_state.clone();
        HelpPage {
            props: Props {
                list_state,
                ..Props::from(state)
            },
            ..self
        }
    }

    fn name(&self) -> &str {
        "Help Page"
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.navigate(false),
            KeyCode::Char('k') | KeyCode::Up => self.navigate(true),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                let _ = self.action_tx.send(Action::Exit);
            }
            KeyCode::Char('q') => {
                let _ = self.action_tx.send(Action::Exit);
            }
            KeyCode::Esc => {
                let _ = self.action_tx.send(Action::Navigate { page: ActivePage::Upload });
            }
            _ => {}
        }
    }
}

impl ComponentRender<()> for HelpPage {
    fn render(&self, frame: &mut Frame, _props: ()) {
        let chunks = Layout::vertical([Constraint::Min(3), Constraint::Length(3)]).split(frame.area());

        let items: Vec<ListItem> = self.props.commands.iter().map(|(cmd, desc)| {
            let text = vec![
                Line::from(vec![
                    Span::raw(cmd),
                    Span::raw("  -  "),
                    Span::styled(desc, Style::new().green().italic()),
                    ".".into(),
                ]),
            ];
            ListItem::new(text)
        }).collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Commands"))
            .highlight_style(Style::default().add_modifier(Modifier::BOLD))
            .highlight_symbol(">> ");

        frame.render_stateful_widget(list, chunks[0], &mut self.props.list_state.clone());

        let about = Paragraph::new(format!("Uploads are sent as multipart/form-data to {}", self.props.destination))
            .block(Block::default().borders(Borders::ALL).title("About"));
        frame.render_widget(about, chunks[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_navigate_stays_in_bounds() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut page = HelpPage::new(&State::default(), tx);
        for _ in 0..20 {
            page.navigate(false);
        }
        assert_eq!(page.props.list_state.selected(), Some(page.props.commands.len() - 1));
        for _ in 0..20 {
            page.navigate(true);
        }
        assert_eq!(page.props.list_state.selected(), Some(0));
    }

    #[test]
    fn test_esc_returns_to_upload_page() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut page = HelpPage::new(&State::default(), tx);
        page.handle_key_event(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert_eq!(rx.try_recv().unwrap(), Action::Navigate { page: ActivePage::Upload });
    }

    #[test]
    fn test_ctrl_c_exits_from_help() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut page = HelpPage::new(&State::default(), tx);
        page.handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(rx.try_recv().unwrap(), Action::Exit);
    }
}
