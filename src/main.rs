//! Runcook entry point
//!
//! Native: headless demo that plays one autopilot run, records it with a
//! skill prediction, then cooks a recipe through the progression engine.
//! Storage goes to `RUNCOOK_DATA_DIR` (default `./runcook-data`).

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
    }

    let store = runcook::platform::default_store();
    let settings = runcook::Settings::load(&store);
    let progression = runcook::Progression::load(store);
    log::info!(
        "Runcook (web) ready: theme {}, {} XP ({})",
        settings.theme.as_str(),
        progression.state().total_xp,
        progression.state().rank().display_name()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Runcook (native) starting...");

    let store = runcook::persistence::FileStore::new(runcook::platform::data_dir());
    let settings = runcook::Settings::load(&store);
    log::info!(
        "Theme: {}, AI difficulty: {}, sound: {}",
        settings.theme.display_name(),
        settings.ai_adjusts_difficulty,
        settings.sound_effects
    );

    demo_run(store.clone());
    demo_cook(store);
}

/// Play one autopilot run and store it
#[cfg(not(target_arch = "wasm32"))]
fn demo_run(store: runcook::persistence::FileStore) {
    use runcook::consts::SIM_DT;
    use runcook::predictor::{DistanceBands, SkillPredictor};
    use runcook::runs::{RunRepository, format_relative};
    use runcook::sim::{RunEvent, RunState, autopilot, tick};
    use runcook::{RunRecorder, StoredRuns};

    // 5 minutes of sim time at most
    const MAX_TICKS: u32 = 60 * 60 * 5;

    let now = runcook::platform::now_ms();
    let seed = now as u64;
    let mut state = RunState::new(seed);
    let mut stats = None;

    for _ in 0..MAX_TICKS {
        let input = autopilot(&state);
        tick(&mut state, &input, SIM_DT);
        for event in state.drain_events() {
            match event {
                RunEvent::BossDefeated => println!("Boss defeated at {:.0}m", state.distance),
                RunEvent::GameOver(s) => stats = Some(s),
                _ => {}
            }
        }
        if state.is_over() {
            break;
        }
    }
    let stats = stats.unwrap_or_else(|| state.stats());

    let mut recorder = RunRecorder::new(
        StoredRuns::new(store),
        SkillPredictor::new(DistanceBands::default()),
    );
    let record = recorder.record(&stats, runcook::platform::now_ms());

    println!("\n== Run (seed {seed}) ==");
    println!(
        "Score {}  Distance {:.0}m ({})  Hits {}  Time {:.1}s",
        record.score,
        record.distance,
        state.difficulty_label().as_str(),
        record.obstacles_hit,
        record.duration
    );
    println!(
        "Skill: {}  Next run: {:.0}m",
        record.predicted_skill, record.predicted_next_distance
    );

    println!("\nRecent runs:");
    let now = runcook::platform::now_ms();
    for run in recorder.runs().query_recent(5) {
        println!(
            "  #{:<3} {:>6.0}m  score {:<4} {}",
            run.id,
            run.distance,
            run.score,
            format_relative(run.timestamp, now)
        );
    }
}

/// Walk a recipe with timers that finish right on time
#[cfg(not(target_arch = "wasm32"))]
fn demo_cook(store: runcook::persistence::FileStore) {
    use runcook::cook::session::CONGRATULATIONS;
    use runcook::cook::{Advance, CookHistory, CookSession, record_completion};
    use runcook::speech::{LogSpeech, Narrator};
    use runcook::{Catalog, Progression};

    let catalog = Catalog::bundled();
    let Some(recipe) = catalog.get("pancakes") else {
        log::error!("Recipe catalog is missing pancakes");
        return;
    };

    let mut progression = Progression::load(store.clone());
    let mut history = CookHistory::new(store);
    progression.subscribe(Box::new(
        |outcome: &runcook::cook::CompletionOutcome, _: &runcook::ProgressionState| {
            for achievement in &outcome.newly_unlocked {
                println!("{} {} unlocked!", achievement.icon, achievement.name);
            }
            if outcome.ranked_up() {
                println!("Rank up: {}", outcome.rank.display_name());
            }
        },
    ));

    let mut narrator = Narrator::new(LogSpeech::new());
    let mut session = CookSession::new(recipe);
    let mut clock = runcook::platform::now_ms();
    if let Some(line) = session.narration(true) {
        narrator.speak(&line);
    }

    println!("\n== Cooking {} ==", recipe.name);
    let (used_timer, perfect_timer) = loop {
        if let Some(step) = session.current_step() {
            println!("  {}. {}", session.step_index() + 1, step.text);
            if let Some(secs) = step.duration {
                if session.start_timer(clock) {
                    clock += f64::from(secs) * 1000.0;
                    session.tick(clock);
                    clock += 1000.0;
                }
            }
        }
        match session.advance(clock) {
            Advance::Step(_) => {
                if let Some(line) = session.narration(false) {
                    narrator.speak(&line);
                }
            }
            Advance::Completed {
                used_timer,
                perfect_timer,
            } => break (used_timer, perfect_timer),
            Advance::Idle => break (false, false),
        }
    };
    narrator.speak(CONGRATULATIONS);

    let outcome = record_completion(
        &mut progression,
        &mut history,
        recipe,
        used_timer,
        perfect_timer,
        runcook::platform::now_ms(),
    );
    narrator.stop();

    let state = progression.state();
    println!(
        "+{} XP  Total {} XP  Rank {}",
        outcome.xp_awarded,
        state.total_xp,
        state.rank().display_name()
    );
    match state.xp_to_next_rank() {
        Some(xp) => println!("{xp} XP to next rank"),
        None => println!("Top rank reached"),
    }
    println!(
        "Achievements: {}/{}",
        state.unlocked_achievements().len(),
        runcook::cook::ACHIEVEMENTS.len()
    );
    for row in history.list() {
        println!("  {} x{}", row.name, row.times_completed);
    }
}
