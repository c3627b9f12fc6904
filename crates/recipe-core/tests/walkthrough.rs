use recipe_core::config::WalkthroughConfig;
use recipe_core::recipe::{CookingStep, Ingredient, PrepStep, Recipe};
use recipe_core::sim::Simulator;
use recipe_core::types::StepCategory;
use recipe_core::walkthrough::{TimerState, WalkthroughController, WalkthroughEvent};

fn build(ingredients: usize, prep: usize, cooking: &[&str]) -> Recipe {
    let mut r = Recipe::new("dinner", "Dinner");
    for i in 0..ingredients {
        r.add_ingredient(Ingredient::new(format!("ingredient {i}")).with_quantity("2 cups"));
    }
    for i in 0..prep {
        r.add_prep_step(PrepStep::new(format!("prep {i}")));
    }
    for (i, t) in cooking.iter().enumerate() {
        let step = CookingStep::new(format!("cook {i}"));
        let step = if t.is_empty() { step } else { step.with_time(*t) };
        r.add_cooking_step(step).unwrap();
    }
    r
}

fn manual() -> WalkthroughConfig {
    WalkthroughConfig::new(false, 0)
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

#[test]
fn position_stays_in_bounds_under_any_sequence() {
    let recipe = build(2, 1, &["", ""]);
    let mut ctl = WalkthroughController::new(&recipe, None, manual());
    let total = ctl.total_steps();

    // A fixed but irregular mix of moves, more than enough to hit both ends.
    let moves = "aaarrrrraaaaaaaarararaaarrrrrrrrraaaaaaaaaa";
    for m in moves.chars() {
        if m == 'a' {
            ctl.advance();
        } else {
            ctl.retreat();
        }
        assert!(ctl.position() < total);
    }
    assert_eq!(ctl.position(), total - 1);
}

#[test]
fn category_mapping_for_three_two_four() {
    let recipe = build(3, 2, &["", "", "", ""]);
    let mut ctl = WalkthroughController::new(&recipe, None, manual());
    let mut seen = vec![(ctl.category(), ctl.category_position())];
    while ctl.advance() {
        seen.push((ctl.category(), ctl.category_position()));
    }

    use StepCategory as C;
    assert_eq!(
        seen,
        [
            (C::Ingredient, 0),
            (C::Ingredient, 1),
            (C::Ingredient, 2),
            (C::PrepStep, 0),
            (C::PrepStep, 1),
            (C::CookingStep, 0),
            (C::CookingStep, 1),
            (C::CookingStep, 2),
            (C::CookingStep, 3),
        ]
    );
}

#[test]
fn advance_then_retreat_restores_position_and_category() {
    let recipe = build(2, 2, &["", ""]);
    for start in 0..5 {
        let mut ctl = WalkthroughController::new(&recipe, None, manual());
        for _ in 0..start {
            ctl.advance();
        }
        let before = (ctl.position(), ctl.category(), ctl.category_position());
        assert!(ctl.advance());
        assert!(ctl.retreat());
        assert_eq!(
            (ctl.position(), ctl.category(), ctl.category_position()),
            before
        );
    }
}

#[test]
fn retreat_into_ingredients_resets_prep_and_cooking() {
    let recipe = build(2, 2, &[""]);
    let mut ctl = WalkthroughController::new(&recipe, None, manual());
    for _ in 0..4 {
        ctl.advance();
    }
    assert_eq!(ctl.position(), 4);

    for _ in 0..3 {
        ctl.retreat();
    }
    assert_eq!(ctl.position(), 1);
    assert_eq!(ctl.progress(StepCategory::Ingredient).completed, 2);
    assert_eq!(ctl.progress(StepCategory::PrepStep).completed, 0);
    assert_eq!(ctl.progress(StepCategory::CookingStep).completed, 0);
}

// ---------------------------------------------------------------------------
// Countdown
// ---------------------------------------------------------------------------

#[test]
fn countdown_reaches_zero_after_exact_tick_count() {
    let recipe = build(1, 0, &[]);
    let mut ctl = WalkthroughController::new(&recipe, None, WalkthroughConfig::new(true, 0));
    ctl.start_timer("00:01:05");
    for _ in 0..65 {
        assert!(matches!(ctl.timer_state(), TimerState::Running(_)));
        ctl.tick();
    }
    assert_eq!(ctl.timer_display().as_deref(), Some("00:00:00"));
    assert_eq!(ctl.timer_state(), TimerState::Expired);
}

#[test]
fn malformed_target_leaves_timer_idle() {
    let recipe = build(1, 0, &[]);
    let mut ctl = WalkthroughController::new(&recipe, None, WalkthroughConfig::new(true, 0));
    ctl.start_timer("bad");
    assert_eq!(ctl.timer_state(), TimerState::Idle);
    assert_eq!(ctl.active_tick_source(), None);
}

#[test]
fn auto_advance_fires_once_after_delay() {
    let recipe = build(0, 0, &["00:00:02", "00:00:10"]);
    let mut sim = Simulator::new(WalkthroughController::new(
        &recipe,
        None,
        WalkthroughConfig::new(true, 5),
    ));

    sim.wait(2);
    assert_eq!(sim.controller().timer_state(), TimerState::Expired);
    sim.wait(4);
    assert_eq!(sim.controller().position(), 0);
    sim.wait(1);
    assert_eq!(sim.controller().position(), 1);

    sim.wait(30);
    let arrivals = sim
        .take_log()
        .into_iter()
        .filter(|e| matches!(e.event, WalkthroughEvent::StepChanged { position: 1, .. }))
        .count();
    assert_eq!(arrivals, 1);
    assert_eq!(sim.controller().position(), 1);
}

#[test]
fn manual_move_during_delay_window_prevents_auto_advance() {
    let recipe = build(0, 0, &["00:00:01", "", ""]);
    let mut sim = Simulator::new(WalkthroughController::new(
        &recipe,
        None,
        WalkthroughConfig::new(true, 5),
    ));
    sim.wait(1);
    assert!(sim.controller().pending_auto_advance().is_some());
    sim.advance();
    sim.wait(10);
    assert_eq!(sim.controller().position(), 1);
}

#[test]
fn pause_freezes_remaining_time() {
    let recipe = build(0, 0, &["00:00:10"]);
    let mut sim = Simulator::new(WalkthroughController::new(
        &recipe,
        None,
        WalkthroughConfig::new(true, 0),
    ));
    sim.wait(3);
    sim.toggle_pause();
    sim.wait(5);
    assert_eq!(sim.controller().timer_display().as_deref(), Some("00:00:07"));
    sim.toggle_pause();
    sim.wait(1);
    assert_eq!(sim.controller().timer_display().as_deref(), Some("00:00:06"));
}

#[test]
fn end_to_end_single_ingredient_and_timed_step() {
    let recipe = build(1, 0, &["00:00:03"]);
    let mut sim = Simulator::new(WalkthroughController::new(
        &recipe,
        None,
        WalkthroughConfig::new(true, 0),
    ));
    assert_eq!(sim.controller().position(), 0);
    assert_eq!(sim.controller().category(), StepCategory::Ingredient);

    assert!(sim.advance());
    assert_eq!(sim.controller().position(), 1);
    assert_eq!(sim.controller().timer_display().as_deref(), Some("00:00:03"));

    sim.wait(3);
    assert_eq!(sim.controller().timer_state(), TimerState::Expired);
    // The auto-advance fired at the last step and changed nothing.
    assert_eq!(sim.controller().pending_auto_advance(), None);
    assert_eq!(sim.controller().position(), 1);
    assert!(!sim.controller().shows_next());
}
