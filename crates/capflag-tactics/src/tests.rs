#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use capflag_core::enums::{GameRules, TacticalAction, TeamColor};
    use capflag_core::error::ConfigError;
    use capflag_core::field::Field;
    use capflag_core::types::Vec2;

    use crate::behaviors;
    use crate::policy::{policy_for, BluePolicy, RedPolicy, TacticalPolicy};
    use crate::view::{FlagSight, TeamSight, WorldView};

    const DT: f64 = 1.0;

    /// Owns the arrays a `WorldView` borrows from. Defaults to a 2v2 start
    /// with everyone in their home half.
    struct Scenario {
        field: Field,
        difficulty: u8,
        red_pos: Vec<Vec2>,
        red_vel: Vec<Vec2>,
        red_az: Vec<f64>,
        red_alive: Vec<bool>,
        red_tagged: Vec<bool>,
        red_has_flag: Vec<bool>,
        blue_pos: Vec<Vec2>,
        blue_vel: Vec<Vec2>,
        blue_az: Vec<f64>,
        blue_alive: Vec<bool>,
        blue_tagged: Vec<bool>,
        blue_has_flag: Vec<bool>,
        red_flag_pos: Vec<Vec2>,
        red_flag_captured: Vec<bool>,
        blue_flag_pos: Vec<Vec2>,
        blue_flag_captured: Vec<bool>,
    }

    impl Scenario {
        fn standard(difficulty: u8) -> Self {
            Self {
                field: Field::standard(),
                difficulty,
                red_pos: vec![Vec2::new(130.0, 40.0), Vec2::new(125.0, 45.0)],
                red_vel: vec![Vec2::new(-1.0, 0.0); 2],
                red_az: vec![std::f64::consts::PI; 2],
                red_alive: vec![true; 2],
                red_tagged: vec![false; 2],
                red_has_flag: vec![false; 2],
                blue_pos: vec![Vec2::new(20.0, 40.0), Vec2::new(25.0, 35.0)],
                blue_vel: vec![Vec2::new(1.0, 0.0); 2],
                blue_az: vec![0.0; 2],
                blue_alive: vec![true; 2],
                blue_tagged: vec![false; 2],
                blue_has_flag: vec![false; 2],
                red_flag_pos: vec![Vec2::new(140.0, 40.0)],
                red_flag_captured: vec![false],
                blue_flag_pos: vec![Vec2::new(18.0, 42.0)],
                blue_flag_captured: vec![false],
            }
        }

        fn red_view(&self) -> WorldView<'_> {
            WorldView {
                field: &self.field,
                own: TeamSight {
                    color: TeamColor::Red,
                    speed: 1.0,
                    positions: &self.red_pos,
                    velocities: &self.red_vel,
                    azimuths: &self.red_az,
                    alive: &self.red_alive,
                    tagged: &self.red_tagged,
                    has_flag: &self.red_has_flag,
                },
                enemy: TeamSight {
                    color: TeamColor::Blue,
                    speed: 1.0,
                    positions: &self.blue_pos,
                    velocities: &self.blue_vel,
                    azimuths: &self.blue_az,
                    alive: &self.blue_alive,
                    tagged: &self.blue_tagged,
                    has_flag: &self.blue_has_flag,
                },
                own_flags: FlagSight {
                    positions: &self.red_flag_pos,
                    captured: &self.red_flag_captured,
                },
                enemy_flags: FlagSight {
                    positions: &self.blue_flag_pos,
                    captured: &self.blue_flag_captured,
                },
                difficulty: self.difficulty,
            }
        }

        fn blue_view(&self) -> WorldView<'_> {
            WorldView {
                field: &self.field,
                own: TeamSight {
                    color: TeamColor::Blue,
                    speed: 1.0,
                    positions: &self.blue_pos,
                    velocities: &self.blue_vel,
                    azimuths: &self.blue_az,
                    alive: &self.blue_alive,
                    tagged: &self.blue_tagged,
                    has_flag: &self.blue_has_flag,
                },
                enemy: TeamSight {
                    color: TeamColor::Red,
                    speed: 1.0,
                    positions: &self.red_pos,
                    velocities: &self.red_vel,
                    azimuths: &self.red_az,
                    alive: &self.red_alive,
                    tagged: &self.red_tagged,
                    has_flag: &self.red_has_flag,
                },
                own_flags: FlagSight {
                    positions: &self.blue_flag_pos,
                    captured: &self.blue_flag_captured,
                },
                enemy_flags: FlagSight {
                    positions: &self.red_flag_pos,
                    captured: &self.red_flag_captured,
                },
                difficulty: self.difficulty,
            }
        }
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    // ---- View queries ----

    #[test]
    fn test_intruder_detection() {
        let mut scenario = Scenario::standard(3);
        assert!(scenario.red_view().enemies_in_territory().is_empty());

        scenario.blue_pos[0] = Vec2::new(100.0, 40.0);
        assert_eq!(scenario.red_view().enemies_in_territory(), vec![0]);

        scenario.blue_tagged[0] = true;
        assert!(scenario.red_view().untagged_enemies_in_territory().is_empty());
        assert_eq!(scenario.red_view().tagged_enemies_in_territory(), vec![0]);
    }

    #[test]
    fn test_extremal_enemy_queries() {
        let scenario = Scenario::standard(5);
        let view = scenario.red_view();
        assert_eq!(view.highest_enemy(), Some(0)); // y = 40 vs 35
        assert_eq!(view.lowest_enemy(), Some(1));
        assert_eq!(view.closest_enemy_to_own_flag(), Some(1)); // 25,35 is nearer (140,40)
    }

    #[test]
    fn test_flag_holder_query() {
        let mut scenario = Scenario::standard(4);
        assert_eq!(scenario.red_view().enemy_flag_holder(), None);
        scenario.blue_has_flag[1] = true;
        assert_eq!(scenario.red_view().enemy_flag_holder(), Some(1));
    }

    // ---- Red controller ----

    #[test]
    fn test_red_naive_defender_loops_flag() {
        let scenario = Scenario::standard(1);
        let view = scenario.red_view();
        let mut policy = RedPolicy::new(GameRules::Ctf, 2).unwrap();
        let commands = policy.decide(&view, &mut rng(), DT);

        assert_eq!(policy.last_actions()[0], TacticalAction::Wait);
        assert_eq!(commands[0], behaviors::wait_at_team_flag(&view, 0, 0, DT));
    }

    #[test]
    fn test_red_defender_intercepts_intruder() {
        let mut scenario = Scenario::standard(2);
        scenario.blue_pos[0] = Vec2::new(100.0, 40.0);
        let view = scenario.red_view();
        let mut policy = RedPolicy::new(GameRules::Ctf, 2).unwrap();
        let commands = policy.decide(&view, &mut rng(), DT);

        assert_eq!(policy.last_actions()[0], TacticalAction::GoTag);
        assert_eq!(commands[0], behaviors::go_tag_agent(&view, 0, 0, DT, false));
    }

    #[test]
    fn test_red_defender_waits_with_no_intruders() {
        let scenario = Scenario::standard(3);
        let view = scenario.red_view();
        let mut policy = RedPolicy::new(GameRules::Ctf, 2).unwrap();
        policy.decide(&view, &mut rng(), DT);
        assert_eq!(policy.last_actions()[0], TacticalAction::Wait);
    }

    #[test]
    fn test_red_difficulty_3_targets_closest_to_flag() {
        let mut scenario = Scenario::standard(3);
        // Two intruders; blue 1 is much closer to the red flag.
        scenario.blue_pos[0] = Vec2::new(90.0, 40.0);
        scenario.blue_pos[1] = Vec2::new(130.0, 41.0);
        let view = scenario.red_view();
        let mut policy = RedPolicy::new(GameRules::Ctf, 2).unwrap();
        let commands = policy.decide(&view, &mut rng(), DT);

        assert_eq!(commands[0], behaviors::go_tag_agent(&view, 0, 1, DT, false));
    }

    #[test]
    fn test_red_full_defense_splits_top_and_bottom() {
        let mut scenario = Scenario::standard(5);
        scenario.blue_pos[0] = Vec2::new(100.0, 60.0);
        scenario.blue_pos[1] = Vec2::new(100.0, 20.0);
        let view = scenario.red_view();
        let mut policy = RedPolicy::new(GameRules::Ctf, 2).unwrap();
        let commands = policy.decide(&view, &mut rng(), DT);

        // At difficulty 5 every agent defends: 0 takes the top intruder,
        // 1 takes the bottom one.
        assert_eq!(policy.last_actions(), [TacticalAction::GoTag; 2]);
        assert_eq!(commands[0], behaviors::go_tag_agent(&view, 0, 0, DT, false));
        assert_eq!(commands[1], behaviors::go_tag_agent(&view, 1, 1, DT, false));
    }

    #[test]
    fn test_tagged_override_returns_to_base() {
        let mut scenario = Scenario::standard(3);
        scenario.red_tagged[1] = true;
        let view = scenario.red_view();
        let mut policy = RedPolicy::new(GameRules::Ctf, 2).unwrap();
        let commands = policy.decide(&view, &mut rng(), DT);

        assert_eq!(policy.last_actions()[1], TacticalAction::Tagged);
        assert_eq!(commands[1], behaviors::go_to_base(&view, 1, 0, DT));
    }

    #[test]
    fn test_red_attack_lane_is_sticky() {
        let scenario = Scenario::standard(3);
        let view = scenario.red_view();
        let mut policy = RedPolicy::new(GameRules::Ctf, 2).unwrap();
        let mut rng = rng();

        policy.decide(&view, &mut rng, DT);
        let lane = policy.last_actions()[1];
        assert!(lane.is_attack_lane());

        for _ in 0..20 {
            policy.decide(&view, &mut rng, DT);
            assert_eq!(policy.last_actions()[1], lane, "lane must not re-roll");
        }
    }

    #[test]
    fn test_red_lane_rerolls_after_reset() {
        let scenario = Scenario::standard(3);
        let view = scenario.red_view();
        let mut policy = RedPolicy::new(GameRules::Ctf, 2).unwrap();
        let mut rng = rng();

        policy.decide(&view, &mut rng, DT);
        policy.reset();
        assert_eq!(policy.last_actions()[1], TacticalAction::Idle);
    }

    #[test]
    fn test_red_carrier_switches_to_return_lane() {
        let mut scenario = Scenario::standard(3);
        scenario.blue_flag_captured[0] = true;
        scenario.red_has_flag[1] = true;
        let view = scenario.red_view();
        let mut policy = RedPolicy::new(GameRules::Ctf, 2).unwrap();
        policy.decide(&view, &mut rng(), DT);

        assert!(policy.last_actions()[1].is_return_lane());
    }

    #[test]
    fn test_red_supporter_waits_at_enemy_flag() {
        let mut scenario = Scenario::standard(3);
        // Teammate took the flag; agent 1 has nothing to carry.
        scenario.blue_flag_captured[0] = true;
        let view = scenario.red_view();
        let mut policy = RedPolicy::new(GameRules::Ctf, 2).unwrap();
        let commands = policy.decide(&view, &mut rng(), DT);

        assert_eq!(commands[1], behaviors::wait_at_enemy_flag(&view, 1, 0, DT));
    }

    #[test]
    fn test_red_difficulty_4_attacker_assists_defense() {
        let mut scenario = Scenario::standard(4);
        scenario.red_flag_captured[0] = true;
        scenario.blue_has_flag[1] = true;
        let view = scenario.red_view();
        let mut policy = RedPolicy::new(GameRules::Ctf, 2).unwrap();
        let commands = policy.decide(&view, &mut rng(), DT);

        assert_eq!(policy.last_actions()[1], TacticalAction::GoTag);
        assert_eq!(commands[1], behaviors::go_tag_agent(&view, 1, 1, DT, false));
    }

    // ---- Blue controller ----

    #[test]
    fn test_blue_defends_home_until_tag() {
        let scenario = Scenario::standard(3);
        let view = scenario.blue_view();
        let mut policy = BluePolicy::new(GameRules::Ctf, 2).unwrap();
        policy.decide(&view, &mut rng(), DT);

        // Everyone home, no intruders: both agents hold at the flag.
        assert_eq!(policy.last_actions(), [TacticalAction::Wait; 2]);
    }

    #[test]
    fn test_blue_tags_intruder() {
        let mut scenario = Scenario::standard(3);
        scenario.red_pos[0] = Vec2::new(60.0, 40.0);
        let view = scenario.blue_view();
        let mut policy = BluePolicy::new(GameRules::Ctf, 2).unwrap();
        let commands = policy.decide(&view, &mut rng(), DT);

        assert_eq!(policy.last_actions()[0], TacticalAction::GoTag);
        assert_eq!(commands[0], behaviors::go_tag_agent(&view, 0, 0, DT, false));
    }

    #[test]
    fn test_blue_attacks_once_intruder_tagged() {
        let mut scenario = Scenario::standard(3);
        scenario.red_pos[1] = Vec2::new(60.0, 40.0);
        scenario.red_tagged[1] = true;
        let view = scenario.blue_view();
        let mut policy = BluePolicy::new(GameRules::Ctf, 2).unwrap();
        let commands = policy.decide(&view, &mut rng(), DT);

        // An intruder is tagged: the defense phase is over.
        assert_eq!(
            commands[1],
            behaviors::go_to_enemy_flag_smartest(&view, 1, 0, DT)
        );
    }

    #[test]
    fn test_blue_skips_defense_at_difficulty_5() {
        let scenario = Scenario::standard(5);
        let view = scenario.blue_view();
        let mut policy = BluePolicy::new(GameRules::Ctf, 2).unwrap();
        let commands = policy.decide(&view, &mut rng(), DT);

        // Red never attacks at difficulty 5, so blue goes straight to the
        // equidistant-confusion attack.
        assert_eq!(
            commands[0],
            behaviors::go_to_enemy_flag_smartest(&view, 0, 0, DT)
        );
    }

    #[test]
    fn test_blue_naive_defender_is_agent_zero_only() {
        let scenario = Scenario::standard(1);
        let view = scenario.blue_view();
        let mut policy = BluePolicy::new(GameRules::Ctf, 2).unwrap();
        policy.decide(&view, &mut rng(), DT);

        assert_eq!(policy.last_actions()[0], TacticalAction::Wait);
        assert!(policy.last_actions()[1].is_attack_lane());
    }

    #[test]
    fn test_blue_carrier_returns_smart() {
        let mut scenario = Scenario::standard(2);
        scenario.red_flag_captured[0] = true;
        scenario.blue_has_flag[1] = true;
        scenario.blue_pos[1] = Vec2::new(135.0, 40.0); // deep in red half
        let view = scenario.blue_view();
        let mut policy = BluePolicy::new(GameRules::Ctf, 2).unwrap();
        let commands = policy.decide(&view, &mut rng(), DT);

        assert_eq!(commands[1], behaviors::return_smarter(&view, 1, 0, DT));
    }

    // ---- Behavior details ----

    #[test]
    fn test_go_tag_uses_pn_when_target_ahead() {
        let mut scenario = Scenario::standard(2);
        // Blue 0 heading east, red intruder dead ahead.
        scenario.red_pos[0] = Vec2::new(60.0, 40.0);
        let view = scenario.blue_view();

        let command = behaviors::go_tag_agent(&view, 0, 0, DT, false);
        let pn = capflag_guidance::laws::proportional_navigation(
            scenario.blue_pos[0],
            scenario.blue_vel[0],
            scenario.red_pos[0],
            scenario.red_vel[0],
            None,
        );
        assert_eq!(command, pn);
    }

    #[test]
    fn test_go_tag_uses_direct_path_when_target_behind() {
        let mut scenario = Scenario::standard(2);
        // Blue 0 heading east, target behind it to the west.
        scenario.blue_pos[0] = Vec2::new(40.0, 40.0);
        scenario.red_pos[0] = Vec2::new(5.0, 40.0);
        let view = scenario.blue_view();

        let command = behaviors::go_tag_agent(&view, 0, 0, DT, false);
        let direct = capflag_guidance::laws::take_direct_path(
            scenario.blue_pos[0],
            scenario.red_pos[0],
            1.0,
            scenario.blue_az[0],
            DT,
        );
        assert_eq!(command, direct);
    }

    #[test]
    fn test_attack_lane_routes_via_waypoint_at_home() {
        let scenario = Scenario::standard(1);
        let view = scenario.blue_view();
        // Blue agent 1 is in its own half: attack_top steers to the upper
        // midline waypoint, not the flag.
        let command = behaviors::attack_top(&view, 1, 0, DT);
        let to_waypoint = capflag_guidance::laws::take_direct_path(
            scenario.blue_pos[1],
            scenario.field.top(),
            1.0,
            scenario.blue_az[1],
            DT,
        );
        assert_eq!(command, to_waypoint);
    }

    #[test]
    fn test_return_lane_heads_home_from_own_half() {
        let scenario = Scenario::standard(1);
        let view = scenario.blue_view();
        let command = behaviors::return_centre(&view, 0, 0, DT);
        assert_eq!(command, behaviors::go_to_base(&view, 0, 0, DT));
    }

    // ---- Construction ----

    #[test]
    fn test_policies_reject_attack_defend_goal() {
        assert!(matches!(
            RedPolicy::new(GameRules::AttackDefend, 2),
            Err(ConfigError::UnsupportedGoal { .. })
        ));
        assert!(matches!(
            policy_for(TeamColor::Blue, GameRules::AttackDefend, 2),
            Err(ConfigError::UnsupportedGoal { .. })
        ));
    }
}
