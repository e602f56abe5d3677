//! Context prompt construction for assistant calls.
//!
//! The prompt is rebuilt from live registry state for every call, so the
//! assistant always sees current room counts rather than a stale snapshot.

/// Build the context prompt handed to the assistant alongside a question.
///
/// # Arguments
///
/// * `username` - The requesting user's name
/// * `current_room` - The room the requester is currently in
/// * `rooms` - Live `(room name, member count)` pairs from the registry
pub fn build_context_prompt(
    username: &str,
    current_room: &str,
    rooms: &[(String, usize)],
) -> String {
    let mut rooms_info = format!("There are currently {} rooms.\n", rooms.len());
    rooms_info.push_str("Here is a list of them:\n");
    for (i, (name, count)) in rooms.iter().enumerate() {
        rooms_info.push_str(&format!("  {}. {} ({} user(s))\n", i + 1, name, count));
    }

    let usage = "Commands available:\n\
        \x20 /help\n\
        \x20 /join <room>\n\
        \x20 /rooms\n\
        \x20 /history\n\
        \x20 /ai <question>\n\
        \x20 /privateai <question>\n\
        \x20 /listusers\n\
        \nWhen user explicitly wants you to DO a command on their behalf, produce:\n\
        [PerformCommand] /join <room>\n\
        (or /history, /rooms, etc.) exactly.\n\
        If you're only explaining, do NOT prefix with [PerformCommand].\n";

    format!(
        "AI: You are an AI assistant called ChatSphere AI for a chat server called ChatSphere.\n\
         User's name is '{username}', in room '{current_room}'.\n\
         Provide accurate info about rooms & user counts, etc.\n\
         {rooms_info}\n{usage}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_user_and_room() {
        // テスト項目: プロンプトに利用者名と現在のルームが含まれる
        // given (前提条件):
        let rooms = vec![("general".to_string(), 2)];

        // when (操作):
        let prompt = build_context_prompt("alice", "general", &rooms);

        // then (期待する結果):
        assert!(prompt.contains("User's name is 'alice', in room 'general'."));
    }

    #[test]
    fn test_prompt_reflects_live_room_list() {
        // テスト項目: プロンプトに現在のルーム一覧と人数が番号付きで含まれる
        // given (前提条件):
        let rooms = vec![("general".to_string(), 2), ("sports".to_string(), 1)];

        // when (操作):
        let prompt = build_context_prompt("bob", "sports", &rooms);

        // then (期待する結果):
        assert!(prompt.contains("There are currently 2 rooms."));
        assert!(prompt.contains("  1. general (2 user(s))"));
        assert!(prompt.contains("  2. sports (1 user(s))"));
    }

    #[test]
    fn test_prompt_explains_directive_syntax() {
        // テスト項目: プロンプトにディレクティブの書式説明が含まれる
        let prompt = build_context_prompt("alice", "general", &[]);
        assert!(prompt.contains("[PerformCommand] /join <room>"));
        assert!(prompt.contains("/privateai <question>"));
    }
}
