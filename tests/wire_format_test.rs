use std::sync::Arc;

use duel_tetris::core::{game_reducer, Game};
use duel_tetris::types::{ActionKind, GameAction, GameId, UserId};

#[test]
fn action_messages_parse() {
    let drop = r#"{"type":"DROP","actionId":7,"prevActionId":6,"userId":"alice","rows":1}"#;
    let action: GameAction = serde_json::from_str(drop).unwrap();
    assert_eq!(
        action,
        GameAction::new(7, 6, UserId::from("alice"), ActionKind::Drop { rows: 1 })
    );

    let ping = r#"{"type":"PING","actionId":3,"prevActionId":2,"userId":"bob","time":1700000000}"#;
    let action: GameAction = serde_json::from_str(ping).unwrap();
    assert_eq!(action.kind, ActionKind::Ping { time: 1_700_000_000 });

    let ready = r#"{"type":"PLAYER_READY","actionId":1,"prevActionId":0,"userId":"bob"}"#;
    let action: GameAction = serde_json::from_str(ready).unwrap();
    assert_eq!(action.kind, ActionKind::PlayerReady);
}

#[test]
fn join_has_no_predecessor_on_the_wire() {
    let join = GameAction::join(1, UserId::from("bob"));
    let v: serde_json::Value = serde_json::to_value(&join).unwrap();

    assert_eq!(v["type"], "JOIN_GAME");
    assert_eq!(v["actionId"], 1);
    assert_eq!(v["userId"], "bob");
    assert!(v.get("prevActionId").is_none());
}

#[test]
fn unknown_action_type_is_rejected() {
    let bad = r#"{"type":"HOLD","actionId":2,"prevActionId":1,"userId":"alice"}"#;
    assert!(serde_json::from_str::<GameAction>(bad).is_err());
}

#[test]
fn every_kind_serializes_with_its_wire_name() {
    let kinds = [
        ActionKind::JoinGame,
        ActionKind::PlayerReady,
        ActionKind::PlayerPause,
        ActionKind::Drop { rows: 2 },
        ActionKind::MoveLeft,
        ActionKind::MoveRight,
        ActionKind::Rotate,
        ActionKind::EnableAcceleration,
        ActionKind::DisableAcceleration,
        ActionKind::AppendPendingBlocks,
        ActionKind::Ping { time: 5 },
    ];
    for kind in kinds {
        let action = GameAction::new(2, 1, UserId::from("a"), kind.clone());
        let v = serde_json::to_value(&action).unwrap();
        assert_eq!(v["type"], kind.as_str());

        let back: GameAction = serde_json::from_value(v).unwrap();
        assert_eq!(back.kind, kind);
    }
}

#[test]
fn game_state_uses_camel_case_fields() {
    let game = Arc::new(Game::new(GameId(8), UserId::from("alice")));
    let action = GameAction::new(1, 0, UserId::from("alice"), ActionKind::PlayerReady);
    let game = game_reducer(Some(&game), &action).unwrap();

    let v = serde_json::to_value(&*game).unwrap();
    assert_eq!(v["id"], 8);
    assert_eq!(v["dropFrames"], 48.0);

    let player = &v["players"][0];
    assert_eq!(player["userId"], "alice");
    assert_eq!(player["lastActionId"], 1);
    assert_eq!(player["status"], "READY");
    // Round state is flattened into the player.
    assert_eq!(player["drops"], 0);
    assert!(player.get("activeTetrominoPosition").is_some());
    assert!(player.get("blocksPending").is_some());

    let back: Game = serde_json::from_value(v).unwrap();
    assert_eq!(back, *game);
}
