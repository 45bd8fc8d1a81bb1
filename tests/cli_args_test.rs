//! Command-line parsing as the binary sees it.

use chateqt::cli::{parse_args, ArgsError, ChatArgs, CliCommand};

fn argv(line: &str) -> std::vec::IntoIter<String> {
    let mut args = vec!["chateqt".to_string()];
    args.extend(line.split_whitespace().map(String::from));
    args.into_iter()
}

#[test]
fn test_chat_continuing_a_conversation() {
    assert_eq!(
        parse_args(argv("chat --conversation c42 and what about bunds")),
        Ok(CliCommand::Chat(ChatArgs {
            query: "and what about bunds".to_string(),
            conversation_id: Some("c42".to_string()),
            json: false,
            cumulative: false,
        }))
    );
}

#[test]
fn test_flags_after_query_are_query_text() {
    match parse_args(argv("chat explain --json output")).unwrap() {
        CliCommand::Chat(chat) => {
            assert_eq!(chat.query, "explain --json output");
            assert!(!chat.json);
        }
        other => panic!("expected chat, got {:?}", other),
    }
}

#[test]
fn test_errors_render_for_humans() {
    let err = parse_args(argv("show")).unwrap_err();
    assert_eq!(err.to_string(), "'show' requires a conversation id");

    let err = parse_args(argv("frobnicate")).unwrap_err();
    assert_eq!(err, ArgsError::UnknownCommand("frobnicate".to_string()));
    assert_eq!(err.to_string(), "unknown command 'frobnicate'");
}
