use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::models::ExportFormat;

#[derive(Debug, Clone)]
pub enum AppAction {
    Quit,
    NextTab,
    PrevTab,
    SelectTab(usize),
    Generate,
    Refresh,
    OpenInBrowser,
    ScrollUp,
    ScrollDown,
    ShowHelp,
    HideHelp,
    // Export menu actions
    ExportMenuOpen,
    ExportMenuCancel,
    ExportCurrent(ExportFormat),
    ExportComprehensive(ExportFormat),
}

pub fn handle_key_event(
    key: KeyEvent,
    export_menu_active: bool,
    show_help: bool,
) -> Option<AppAction> {
    // If help is showing, any key closes it
    if show_help {
        return Some(AppAction::HideHelp);
    }

    // Export menu mode: lowercase exports the current tab, uppercase the
    // comprehensive report
    if export_menu_active {
        return match key.code {
            KeyCode::Char('p') => Some(AppAction::ExportCurrent(ExportFormat::Pdf)),
            KeyCode::Char('j') => Some(AppAction::ExportCurrent(ExportFormat::Json)),
            KeyCode::Char('t') => Some(AppAction::ExportCurrent(ExportFormat::Txt)),
            KeyCode::Char('P') => Some(AppAction::ExportComprehensive(ExportFormat::Pdf)),
            KeyCode::Char('J') => Some(AppAction::ExportComprehensive(ExportFormat::Json)),
            KeyCode::Char('T') => Some(AppAction::ExportComprehensive(ExportFormat::Txt)),
            KeyCode::Esc | KeyCode::Char('q') => Some(AppAction::ExportMenuCancel),
            _ => None,
        };
    }

    // Normal mode
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) => Some(AppAction::Quit),
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(AppAction::Quit),

        (KeyCode::Tab, _) | (KeyCode::Char('l'), _) | (KeyCode::Right, _) => {
            Some(AppAction::NextTab)
        }
        (KeyCode::BackTab, _) | (KeyCode::Char('h'), _) | (KeyCode::Left, _) => {
            Some(AppAction::PrevTab)
        }
        (KeyCode::Char(c @ '1'..='5'), _) => {
            Some(AppAction::SelectTab(c as usize - '1' as usize))
        }

        (KeyCode::Enter, _) | (KeyCode::Char('g'), _) => Some(AppAction::Generate),

        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(AppAction::ScrollDown),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(AppAction::ScrollUp),

        (KeyCode::Char('r'), _) => Some(AppAction::Refresh),
        (KeyCode::Char('o'), _) => Some(AppAction::OpenInBrowser),
        (KeyCode::Char('e'), _) => Some(AppAction::ExportMenuOpen),

        (KeyCode::Char('?'), _) => Some(AppAction::ShowHelp),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn export_menu_captures_format_keys() {
        let action = handle_key_event(key(KeyCode::Char('p')), true, false);
        assert!(matches!(
            action,
            Some(AppAction::ExportCurrent(ExportFormat::Pdf))
        ));
        let action = handle_key_event(key(KeyCode::Esc), true, false);
        assert!(matches!(action, Some(AppAction::ExportMenuCancel)));
    }

    #[test]
    fn help_swallows_every_key() {
        let action = handle_key_event(key(KeyCode::Char('q')), false, true);
        assert!(matches!(action, Some(AppAction::HideHelp)));
    }

    #[test]
    fn digit_keys_select_tabs() {
        let action = handle_key_event(key(KeyCode::Char('3')), false, false);
        assert!(matches!(action, Some(AppAction::SelectTab(2))));
    }
}
