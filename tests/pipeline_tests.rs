//! Tests for the training pipeline, action sources and observers

mod common;

use std::{
    io::Cursor,
    sync::{Arc, Mutex},
};

use common::seeded_learner;
use gridq::{
    grid_world::{Action, Position},
    pipeline::{
        ActionSource, Directive, EpisodeRecord, JsonlObserver, ManualSource, MetricsObserver,
        Observer, PolicySource, RenderObserver, TrainingConfig, TrainingPipeline, TrainingResult,
    },
    q_learning::{EpisodeEnd, EpisodeOutcome, QLearner, StepOutcome},
};

/// Records the order of observer callbacks
#[derive(Clone, Default)]
struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.0.lock().unwrap().push(event);
    }
}

impl Observer for EventLog {
    fn on_training_start(&mut self, target: Option<usize>) -> gridq::Result<()> {
        self.push(format!("start {target:?}"));
        Ok(())
    }

    fn on_step(&mut self, _learner: &QLearner, step: &StepOutcome) -> gridq::Result<()> {
        self.push(format!("step {}", step.action));
        Ok(())
    }

    fn on_episode_end(&mut self, learner: &QLearner, end: &EpisodeEnd) -> gridq::Result<()> {
        self.push(format!("end {} {:?} next {}", end.episode, end.outcome, learner.episode()));
        Ok(())
    }

    fn on_training_end(&mut self, result: &TrainingResult) -> gridq::Result<()> {
        self.push(format!("finish aborted={}", result.aborted));
        Ok(())
    }
}

/// Plays a fixed list of actions, then aborts
struct Scripted(Vec<Action>);

impl ActionSource for Scripted {
    fn next_action(&mut self, _learner: &mut QLearner) -> gridq::Result<Directive> {
        if self.0.is_empty() {
            Ok(Directive::Abort)
        } else {
            Ok(Directive::Act(self.0.remove(0)))
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[test]
fn test_automatic_training_stops_at_episode_target() {
    let mut learner = seeded_learner(42);
    let mut source = PolicySource::from_learner(&learner);
    let mut pipeline = TrainingPipeline::new(TrainingConfig::default());

    let result = pipeline.run(&mut learner, &mut source).unwrap();

    assert!(!result.aborted);
    assert_eq!(result.final_episode, 400);
    assert_eq!(result.episodes_completed, 399);
    assert_eq!(result.successes + result.failures, 399);
    assert_eq!(result.error_rates.len(), 80);
    assert_eq!(result.error_rates, learner.error_rates());
    assert_eq!(result.final_error_rate, learner.error_rate());
    assert!(result.total_moves >= 5 * 399);
    assert_eq!(learner.moves(), 0);
}

#[test]
fn test_target_already_reached_runs_nothing() {
    let mut learner = seeded_learner(1);
    let mut source = PolicySource::new(0.1);
    let mut pipeline = TrainingPipeline::new(TrainingConfig::automatic(1));

    let result = pipeline.run(&mut learner, &mut source).unwrap();

    assert_eq!(result.total_moves, 0);
    assert_eq!(result.episodes_completed, 0);
    assert!(learner.q_table().is_empty());
}

#[test]
fn test_manual_session_until_abort() {
    let mut learner = seeded_learner(7);
    let input = "up\nup\nright\nright\nright\nfly\nd\nq\nleft\n";
    let mut source = ManualSource::new(Cursor::new(input));
    let mut pipeline = TrainingPipeline::new(TrainingConfig::until_abort());

    let result = pipeline.run(&mut learner, &mut source).unwrap();

    assert!(result.aborted);
    assert_eq!(result.total_moves, 6);
    assert_eq!(result.successes, 1);
    assert_eq!(result.failures, 0);
    assert_eq!(source.rejected(), 1);

    // the unfinished second episode is left as it was
    assert_eq!(learner.episode(), 2);
    assert_eq!(learner.moves(), 1);
    assert_eq!(learner.world().current_position(), Position::new(1, 0));
    assert_eq!(learner.last_action(), Some(Action::Right));
}

#[test]
fn test_observer_event_order() {
    let log = EventLog::default();
    let mut learner = seeded_learner(3);
    let mut source = Scripted(vec![
        Action::Right,
        Action::Right,
        Action::Right,
        Action::Up,
        Action::Up,
    ]);
    let mut pipeline =
        TrainingPipeline::new(TrainingConfig::until_abort()).with_observer(Box::new(log.clone()));

    pipeline.run(&mut learner, &mut source).unwrap();

    assert_eq!(
        log.events(),
        vec![
            "start None",
            "step right",
            "step right",
            "step right",
            "step up",
            "end 1 Failure next 2",
            "step up",
            "finish aborted=true",
        ]
    );
}

#[test]
fn test_step_errors_propagate() {
    struct Broken;

    impl ActionSource for Broken {
        fn next_action(&mut self, _learner: &mut QLearner) -> gridq::Result<Directive> {
            Err(gridq::Error::InvalidAction {
                action: "9".to_string(),
            })
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    let mut learner = seeded_learner(3);
    let mut pipeline = TrainingPipeline::new(TrainingConfig::automatic(10));
    let err = pipeline.run(&mut learner, &mut Broken).unwrap_err();
    assert!(matches!(err, gridq::Error::InvalidAction { .. }));
    assert_eq!(learner.episode(), 1);
}

#[test]
fn test_jsonl_observer_writes_episode_records() {
    let temp_file = tempfile::NamedTempFile::new().unwrap();
    let path = temp_file.path().to_path_buf();

    let mut learner = seeded_learner(456);
    let mut source = PolicySource::new(0.2);
    let mut pipeline = TrainingPipeline::new(TrainingConfig::automatic(11))
        .with_observer(Box::new(JsonlObserver::new(&path).unwrap()));

    pipeline.run(&mut learner, &mut source).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let records: Vec<EpisodeRecord> = content
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 10);
    for (idx, record) in records.iter().enumerate() {
        assert_eq!(record.episode, idx + 1);
        assert!(record.moves >= 4);
        match record.outcome {
            EpisodeOutcome::Success => assert_eq!(record.reward, 1.0),
            EpisodeOutcome::Failure => assert_eq!(record.reward, -1.0),
        }
    }
    let last = records.last().unwrap();
    assert_eq!(last.error_rate, learner.errors() as f64 / 10.0);
}

#[test]
fn test_metrics_observer_summary() {
    let mut learner = seeded_learner(5);
    let mut metrics = MetricsObserver::new();

    let path = [Action::Left, Action::Up, Action::Up, Action::Right, Action::Right, Action::Right];
    for action in path {
        let step = learner.apply_action(action).unwrap();
        metrics.on_step(&learner, &step).unwrap();
        if let Some(end) = &step.episode_end {
            metrics.on_episode_end(&learner, end).unwrap();
        }
    }

    let summary = metrics.summary();
    assert_eq!(summary.episodes, 1);
    assert_eq!(summary.successes, 1);
    assert_eq!(summary.success_rate, 1.0);
    assert_eq!(summary.avg_episode_length, 6.0);
    assert_eq!(summary.shortest_episode, Some(6));
    assert_eq!(summary.stationary_moves, 1);
}

#[test]
fn test_render_observer_draws_after_each_step() {
    let mut learner = seeded_learner(5);
    let mut observer = RenderObserver::new(Vec::new());

    let step = learner.apply_action(Action::Up).unwrap();
    observer.on_step(&learner, &step).unwrap();
    // (1, 1) is a wall, so the agent stays put
    let step = learner.apply_action(Action::Right).unwrap();
    observer.on_step(&learner, &step).unwrap();
    let step = learner.apply_action(Action::Up).unwrap();
    observer.on_step(&learner, &step).unwrap();

    let text = String::from_utf8(observer.into_inner()).unwrap();
    assert!(text.contains("Action: up ((0, 0) -> (0, 1), reward -0.04)"));
    assert!(text.contains("Action: right ((0, 1) -> (0, 1), reward -0.04)"));
    assert!(text.contains("Action: up ((0, 1) -> (0, 2), reward -0.04)"));
    assert_eq!(text.matches("EPISODE: 1, MOVE: ").count(), 3);
    assert!(text.contains("EPISODE: 1, MOVE: 3, ERROR RATE: 0.00"));
}

#[test]
fn test_training_result_round_trip_and_csv() {
    let dir = tempfile::tempdir().unwrap();
    let mut learner = seeded_learner(8);
    let mut source = PolicySource::from_learner(&learner);
    let result = TrainingPipeline::new(TrainingConfig::automatic(16))
        .run(&mut learner, &mut source)
        .unwrap();

    let json = dir.path().join("result.json");
    result.save(&json).unwrap();
    let loaded = TrainingResult::load(&json).unwrap();
    assert_eq!(loaded.final_episode, 16);
    assert_eq!(loaded.episodes_completed, result.episodes_completed);
    assert_eq!(loaded.total_moves, result.total_moves);
    assert_eq!(loaded.error_rates.len(), 3);
    for (a, b) in loaded.error_rates.iter().zip(&result.error_rates) {
        assert!((a - b).abs() < 1e-12);
    }

    let csv_path = dir.path().join("rates.csv");
    result.save_error_rates(&csv_path).unwrap();
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "episode,error_rate");
    assert_eq!(lines.len(), 1 + 3);
    assert!(lines[1].starts_with("5,"));
    assert!(lines[3].starts_with("15,"));
}
