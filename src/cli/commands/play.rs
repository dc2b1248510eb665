//! Play command - manual training from stdin

use std::io::BufReader;

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::{
        config::LearnerArgs,
        output::{format_percent, print_section, print_stats_table},
    },
    grid_world::GridWorld,
    pipeline::{ManualSource, RenderObserver, TrainingConfig, TrainingPipeline},
    q_learning::QLearner,
    render::render_grid,
};

#[derive(Parser, Debug)]
#[command(about = "Move the agent by hand; the table still learns from every move")]
pub struct PlayArgs {
    #[command(flatten)]
    pub learner: LearnerArgs,
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let config = args.learner.resolve()?;
    let mut learner = QLearner::new(GridWorld::canonical(), config)?;

    println!(">>> Type up/down/left/right (or w/a/s/d) and press enter. Empty line or 'q' quits. <<<");
    println!("{}", render_grid(&learner.snapshot()));

    let mut source = ManualSource::new(BufReader::new(std::io::stdin()));
    let mut pipeline = TrainingPipeline::new(TrainingConfig::until_abort())
        .with_observer(Box::new(RenderObserver::stdout()));
    let result = pipeline.run(&mut learner, &mut source)?;

    print_section("Session Summary");
    print_stats_table(&[
        ("Episodes", result.episodes_completed.to_string()),
        ("Successes", result.successes.to_string()),
        ("Failures", result.failures.to_string()),
        ("Error rate", format_percent(result.final_error_rate)),
    ]);

    Ok(())
}
