use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use duel_tetris::core::{game_reducer, tetromino_at, Game, GameSnapshot, Well};
use duel_tetris::types::{ActionKind, Block, Color, GameAction, GameId, UserId};

fn ready_game() -> Arc<Game> {
    let game = Arc::new(Game::new(GameId(12345), UserId::from("bench")));
    let ready = GameAction::new(1, 0, UserId::from("bench"), ActionKind::PlayerReady);
    game_reducer(Some(&game), &ready).unwrap()
}

fn bench_line_clear(c: &mut Criterion) {
    let mut well = Well::blank();
    // Fill bottom 4 rows
    for y in 16..20 {
        for x in 0..10 {
            well.set(x, y, Some(Block { id: 1, color: Color(0x808080) }));
        }
    }

    c.bench_function("clear_4_lines", |b| {
        b.iter(|| black_box(&well).clear_lines())
    });
}

fn bench_drop(c: &mut Criterion) {
    let game = ready_game();
    let action = GameAction::new(2, 1, UserId::from("bench"), ActionKind::Drop { rows: 1 });

    c.bench_function("reduce_drop_one_row", |b| {
        b.iter(|| game_reducer(Some(&game), black_box(&action)))
    });
}

fn bench_hard_landing(c: &mut Criterion) {
    let game = ready_game();
    let action = GameAction::new(2, 1, UserId::from("bench"), ActionKind::Drop { rows: 40 });

    c.bench_function("reduce_landing", |b| {
        b.iter(|| game_reducer(Some(&game), black_box(&action)))
    });
}

fn bench_move(c: &mut Criterion) {
    let game = ready_game();
    let action = GameAction::new(2, 1, UserId::from("bench"), ActionKind::MoveRight);

    c.bench_function("reduce_move", |b| {
        b.iter(|| game_reducer(Some(&game), black_box(&action)))
    });
}

fn bench_rotate(c: &mut Criterion) {
    let game = ready_game();
    let action = GameAction::new(2, 1, UserId::from("bench"), ActionKind::Rotate);

    c.bench_function("reduce_rotate", |b| {
        b.iter(|| game_reducer(Some(&game), black_box(&action)))
    });
}

fn bench_sequencer(c: &mut Criterion) {
    let mut drop = 0u32;
    c.bench_function("tetromino_at", |b| {
        b.iter(|| {
            drop = drop.wrapping_add(1);
            tetromino_at(black_box(GameId(12345)), 0, drop)
        })
    });
}

fn bench_digest(c: &mut Criterion) {
    let game = ready_game();
    c.bench_function("snapshot_digest", |b| {
        b.iter(|| GameSnapshot::from(black_box(&*game)).digest())
    });
}

criterion_group!(
    benches,
    bench_line_clear,
    bench_drop,
    bench_hard_landing,
    bench_move,
    bench_rotate,
    bench_sequencer,
    bench_digest
);
criterion_main!(benches);
