use kidsafe_core::{
    AppViewModel, BackendState, Msg, MSG_BACKEND_NOT_READY, MSG_MANUAL_REQUIRED, MSG_NAME_REQUIRED,
};

use super::constants::{
    ASK_NEEDS_QUESTION, ASK_NEEDS_RESULT, CHAT_BUSY, LOOKUP_BUSY, MANUAL_NOT_ACTIVE,
};

/// What a typed line asks the app to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Vec<Msg>),
    Help,
    List,
    Quit,
    Empty,
    Unknown(String),
}

/// Parses one input line. `catalog` is the brand list as last rendered, so
/// `select` accepts a 1-based index or a case-insensitive brand name.
pub fn parse_command(line: &str, catalog: &[String]) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "help" | "?" => Command::Help,
        "list" | "ls" => Command::List,
        "quit" | "exit" | "q" => Command::Quit,
        "clear" => Command::Dispatch(vec![Msg::CatalogSelected(None)]),
        "select" if rest.is_empty() => Command::Unknown("select needs a brand".to_string()),
        "select" => Command::Dispatch(vec![Msg::CatalogSelected(Some(resolve_brand(
            rest, catalog,
        )))]),
        "search" if rest.is_empty() => Command::Dispatch(vec![Msg::SearchSubmitted]),
        "search" => Command::Dispatch(vec![
            Msg::SearchInputChanged(rest.to_string()),
            Msg::SearchSubmitted,
        ]),
        "ingredients" => Command::Dispatch(vec![Msg::ManualIngredientsChanged(rest.to_string())]),
        "analyze" if rest.is_empty() => Command::Dispatch(vec![Msg::ManualAnalyzeSubmitted]),
        "analyze" => Command::Dispatch(vec![
            Msg::ManualIngredientsChanged(rest.to_string()),
            Msg::ManualAnalyzeSubmitted,
        ]),
        "ask" if rest.is_empty() => Command::Unknown("ask needs a question".to_string()),
        "ask" => Command::Dispatch(vec![
            Msg::ChatInputChanged(rest.to_string()),
            Msg::ChatSubmitted,
        ]),
        _ => Command::Unknown(format!("unknown command `{verb}`")),
    }
}

/// Refuses actions the view model currently disables, with the reason to
/// show. Enabled actions go through to `update`.
pub fn blocked(view: &AppViewModel, msg: &Msg) -> Option<&'static str> {
    match msg {
        Msg::SearchSubmitted if !view.search_enabled => {
            Some(if view.resolution.is_pending() {
                LOOKUP_BUSY
            } else {
                MSG_NAME_REQUIRED
            })
        }
        Msg::ManualAnalyzeSubmitted if !view.analyze_enabled => Some(analyze_refusal(view)),
        Msg::ChatInputChanged(_) => match &view.chat {
            None => Some(ASK_NEEDS_RESULT),
            Some(chat) if chat.pending => Some(CHAT_BUSY),
            Some(_) => None,
        },
        Msg::ChatSubmitted => match &view.chat {
            None => Some(ASK_NEEDS_RESULT),
            Some(chat) if chat.send_enabled => None,
            Some(chat) if chat.pending => Some(CHAT_BUSY),
            Some(_) => Some(ASK_NEEDS_QUESTION),
        },
        _ => None,
    }
}

fn analyze_refusal(view: &AppViewModel) -> &'static str {
    if view.resolution.is_pending() {
        LOOKUP_BUSY
    } else if !view.manual_mode {
        MANUAL_NOT_ACTIVE
    } else if view.backend != BackendState::Ready {
        MSG_BACKEND_NOT_READY
    } else {
        MSG_MANUAL_REQUIRED
    }
}

fn resolve_brand(arg: &str, catalog: &[String]) -> String {
    if let Ok(index) = arg.parse::<usize>() {
        if let Some(brand) = index.checked_sub(1).and_then(|i| catalog.get(i)) {
            return brand.clone();
        }
    }
    catalog
        .iter()
        .find(|brand| brand.eq_ignore_ascii_case(arg))
        .cloned()
        .unwrap_or_else(|| arg.to_string())
}
