//! Whole-game throughput.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use courtsim::{simulate_game, GameConfig, GameOptions, TeamBuilder};

fn bench_games(c: &mut Criterion) {
    let config = GameConfig::default();
    let home = TeamBuilder::new(1, "Home").build(1).unwrap();
    let away = TeamBuilder::new(2, "Away").build(2).unwrap();

    let mut seed = 0u64;
    c.bench_function("simulate_game", |b| {
        b.iter(|| {
            seed += 1;
            simulate_game(&config, &home, &away, GameOptions::default(), black_box(seed)).unwrap()
        })
    });

    let logged = GameOptions::default().with_play_by_play(true);
    c.bench_function("simulate_game_play_by_play", |b| {
        b.iter(|| simulate_game(&config, &home, &away, logged.clone(), black_box(7)).unwrap())
    });
}

criterion_group!(benches, bench_games);
criterion_main!(benches);
