//! Property tests over random seeds and rosters.

use proptest::prelude::*;

use courtsim::core::{FatigueConfig, GameRng};
use courtsim::sim::pick_player;
use courtsim::{
    simulate_game, CompositeRating, GameConfig, GameOptions, PlayerGameSim, PlayerId, Position,
    Stat, TeamBuilder,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Any seed and roster strengths finish within the overtime cap with
    /// consistent scores.
    #[test]
    fn test_games_terminate_consistently(
        seed in any::<u64>(),
        home_strength in 0.2f64..0.8,
        away_strength in 0.2f64..0.8,
    ) {
        let home = TeamBuilder::new(1, "Home").strength(home_strength).build(seed).unwrap();
        let away = TeamBuilder::new(2, "Away").strength(away_strength).build(seed ^ 0xA5A5).unwrap();
        let config = GameConfig::default().with_max_overtimes(Some(2));

        let result = simulate_game(&config, &home, &away, GameOptions::default(), seed).unwrap();
        prop_assert!(result.overtimes <= 2);

        let score = result.score();
        for (side, team) in result.teams.iter() {
            prop_assert_eq!(team.pts_by_period.iter().sum::<u32>(), score[side]);
            prop_assert_eq!(team.pts_by_period.len(), 4 + result.overtimes as usize);
            for player in &team.players {
                for (_, value) in player.stats.iter() {
                    prop_assert!(value.is_finite() && value >= 0.0);
                }
            }
        }
        if result.winner().is_none() {
            prop_assert_eq!(result.overtimes, 2);
        }
    }

    /// Energy stays in [0, 1] whatever is added or drained.
    #[test]
    fn test_energy_clamped(deltas in proptest::collection::vec(-3.0f64..3.0, 1..40)) {
        let mut player = PlayerGameSim::new(PlayerId(1), "P", Position::Forward);
        for delta in deltas {
            player.adjust_energy(delta).unwrap();
            let energy = courtsim::RatingView::energy(&player);
            prop_assert!((0.0..=1.0).contains(&energy));
        }
    }

    /// Weighted picks always land on a candidate, even with zero ratings.
    #[test]
    fn test_pick_player_in_range(
        ratings in proptest::collection::vec(0.0f64..1.0, 1..8),
        seed in any::<u64>(),
    ) {
        let players: Vec<PlayerGameSim> = ratings
            .iter()
            .enumerate()
            .map(|(i, &r)| {
                let mut p = PlayerGameSim::new(PlayerId(i as u32), "P", Position::Guard);
                p.ratings.set(CompositeRating::Usage, r);
                p
            })
            .collect();
        let refs: Vec<&PlayerGameSim> = players.iter().collect();
        let mut rng = GameRng::new(seed);

        let picked = pick_player(
            &refs,
            CompositeRating::Usage,
            2.0,
            0.02,
            &FatigueConfig::default(),
            &mut rng,
        );
        prop_assert!(picked.is_some_and(|i| i < refs.len()));
    }
}

#[test]
fn test_possessions_recorded_for_both_teams() {
    let home = TeamBuilder::new(1, "Home").build(5).unwrap();
    let away = TeamBuilder::new(2, "Away").build(6).unwrap();
    let result = simulate_game(&GameConfig::default(), &home, &away, GameOptions::default(), 5).unwrap();

    for (_, team) in result.teams.iter() {
        assert!(team.stats[Stat::Poss] > 50.0);
        assert!(team.players.iter().all(|p| p.stats[Stat::Poss] == 0.0));
    }
}
