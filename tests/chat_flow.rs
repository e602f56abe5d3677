//! Integration tests driving the registry and dispatcher end to end with
//! the in-memory message store, the way the session read loop does.

use std::sync::Arc;

use tokio::sync::mpsc;

use chatsphere::domain::{Assistant, AssistantError};
use chatsphere::infrastructure::store::InMemoryMessageStore;
use chatsphere::server::dispatch::dispatch;
use chatsphere::server::registry::SessionId;
use chatsphere::server::session::DEFAULT_ROOM;
use chatsphere::server::state::AppState;

struct ScriptedAssistant {
    answer: String,
}

#[async_trait::async_trait]
impl Assistant for ScriptedAssistant {
    async fn ask(&self, _question: &str, _context_prompt: &str) -> Result<String, AssistantError> {
        Ok(self.answer.clone())
    }
}

/// Connect a user the way the session loop does: register, default-join,
/// arrival notice, status broadcast.
async fn connect(state: &AppState, username: &str) -> (SessionId, mpsc::UnboundedReceiver<String>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let id = state.registry.register(username, tx).await;
    state.registry.join(id, DEFAULT_ROOM).await;
    state
        .registry
        .broadcast_to_room(
            &format!("[Server] {username} has joined the chat."),
            DEFAULT_ROOM,
        )
        .await;
    state.registry.broadcast_status().await;
    (id, rx)
}

/// Disconnect a user the way the session loop's cleanup path does.
async fn disconnect(state: &AppState, id: SessionId) {
    state.registry.unregister(id).await;
    state.registry.broadcast_status().await;
}

fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<String> {
    let mut lines = Vec::new();
    while let Ok(line) = rx.try_recv() {
        lines.push(line);
    }
    lines
}

#[tokio::test]
async fn test_two_user_scenario_join_rooms_chat_isolation_listusers() {
    // テスト項目: alice と bob の一連の操作が仕様どおりの観測結果になる
    // given (前提条件): 両者とも general にデフォルト参加する
    let state = AppState::new(Arc::new(InMemoryMessageStore::new()), None);
    let (alice, mut alice_rx) = connect(&state, "alice").await;
    let (bob, mut bob_rx) = connect(&state, "bob").await;
    drain(&mut alice_rx);
    drain(&mut bob_rx);

    // when (操作): alice が sports へ移動する
    dispatch(&state, alice, "/join sports").await;

    // then (期待する結果): bob の /rooms には general(1), sports(1) が見える
    dispatch(&state, bob, "/rooms").await;
    let bob_lines = drain(&mut bob_rx);
    assert!(bob_lines.contains(&"Available rooms:".to_string()));
    assert!(bob_lines.contains(&"  general (1 user(s))".to_string()));
    assert!(bob_lines.contains(&"  sports (1 user(s))".to_string()));

    // when (操作): alice が別室からチャットする
    dispatch(&state, alice, "hi").await;

    // then (期待する結果): bob には届かない
    assert!(drain(&mut bob_rx).is_empty());

    // when (操作): bob が /listusers する
    dispatch(&state, bob, "/listusers").await;

    // then (期待する結果): bob 自身だけが見える
    assert_eq!(
        drain(&mut bob_rx),
        vec!["Users in room 'general':", "  bob"]
    );
}

#[tokio::test]
async fn test_status_total_tracks_connected_sessions() {
    // テスト項目: STATUS の合計は未切断のセッション数と常に一致する
    // given (前提条件):
    let state = AppState::new(Arc::new(InMemoryMessageStore::new()), None);
    let (alice, mut alice_rx) = connect(&state, "alice").await;
    let (_bob, _bob_rx) = connect(&state, "bob").await;
    let (carol, _carol_rx) = connect(&state, "carol").await;
    assert_eq!(state.registry.status_snapshot().await.total_users, 3);

    // when (操作): carol が切断する
    disconnect(&state, carol).await;

    // then (期待する結果): 合計は 2 になり、ルーム別人数の合計とも一致する
    let snapshot = state.registry.status_snapshot().await;
    assert_eq!(snapshot.total_users, 2);
    let per_room: usize = snapshot.rooms.iter().map(|r| r.members).sum();
    assert_eq!(per_room, 2);

    // 生き残ったセッションには更新された STATUS 行が届いている
    let lines = drain(&mut alice_rx);
    assert!(
        lines
            .iter()
            .any(|l| l.starts_with("STATUS: 2 users total."))
    );
    let _ = alice;
}

#[tokio::test]
async fn test_history_round_trip_through_dispatch() {
    // テスト項目: チャットで保存された履歴が /history でそのまま再生される
    // given (前提条件):
    let state = AppState::new(Arc::new(InMemoryMessageStore::new()), None);
    let (alice, mut alice_rx) = connect(&state, "alice").await;
    drain(&mut alice_rx);
    dispatch(&state, alice, "one").await;
    dispatch(&state, alice, "two").await;
    dispatch(&state, alice, "three").await;
    drain(&mut alice_rx);

    // when (操作):
    dispatch(&state, alice, "/history").await;

    // then (期待する結果): ヘッダに続き、送信順のレコードが並ぶ
    let lines = drain(&mut alice_rx);
    assert_eq!(lines[0], "--- Message History for Room: general ---");
    let bodies: Vec<&str> = lines[1..]
        .iter()
        .map(|l| l.split_once("] ").unwrap().1)
        .collect();
    assert_eq!(bodies, vec!["alice: one", "alice: two", "alice: three"]);
}

#[tokio::test]
async fn test_directive_join_moves_requester_and_updates_status() {
    // テスト項目: [PerformCommand] /join lobby を含む回答で要求者が lobby に移る
    // given (前提条件):
    let assistant = Arc::new(ScriptedAssistant {
        answer: "On my way! [PerformCommand] /join lobby".to_string(),
    });
    let state = AppState::new(Arc::new(InMemoryMessageStore::new()), Some(assistant));
    let (alice, mut alice_rx) = connect(&state, "alice").await;
    drain(&mut alice_rx);

    // when (操作):
    dispatch(&state, alice, "/ai take me to the lobby").await;

    // then (期待する結果):
    let (_, room) = state.registry.session_view(alice).await.unwrap();
    assert_eq!(room.as_deref(), Some("lobby"));
    let lines = drain(&mut alice_rx);
    assert!(
        lines
            .iter()
            .any(|l| l.starts_with("STATUS:") && l.contains("lobby(1)"))
    );
}

#[tokio::test]
async fn test_disconnect_notifies_room_and_cleans_membership() {
    // テスト項目: 切断したセッションの退出通知が同室へ届き、メンバーから消える
    // given (前提条件):
    let state = AppState::new(Arc::new(InMemoryMessageStore::new()), None);
    let (alice, _alice_rx) = connect(&state, "alice").await;
    let (_bob, mut bob_rx) = connect(&state, "bob").await;
    drain(&mut bob_rx);

    // when (操作):
    disconnect(&state, alice).await;

    // then (期待する結果):
    let lines = drain(&mut bob_rx);
    assert!(lines.contains(&"[Server] alice has left the chat.".to_string()));
    assert_eq!(state.registry.members_of("general").await, vec!["bob"]);
}
