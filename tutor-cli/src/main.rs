//! Interactive terminal front end for the formula tutor.

mod render;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use formula_tutor::config::{EnvCredentials, TutorSettings};
use formula_tutor::kernel::{Composer, Controller, SubmitOutcome};
use formula_tutor::primitives::GradeLevel;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

/// Ask an AI tutor to explain a math formula.
#[derive(Debug, Parser)]
#[command(name = "formula-tutor", version)]
struct Args {
    /// Grade preselected in the form (초1..초6, 중1..중3, 고1..고3).
    #[arg(long, default_value_t = GradeLevel::default())]
    grade: GradeLevel,

    /// Model identifier to call.
    #[arg(long)]
    model: Option<String>,

    /// Override the service base URL.
    #[arg(long)]
    base_url: Option<String>,
}

enum Command {
    Quit,
    Grades,
    Grade(String),
    Formula(String),
    Empty,
}

fn parse_command(line: &str) -> Command {
    let line = line.trim_end_matches(['\r', '\n']);
    match line.trim() {
        ":quit" | ":q" => Command::Quit,
        ":grades" => Command::Grades,
        trimmed => {
            if let Some(label) = trimmed.strip_prefix(":grade ") {
                Command::Grade(label.trim().to_owned())
            } else if trimmed.is_empty() {
                Command::Empty
            } else {
                Command::Formula(line.to_owned())
            }
        }
    }
}

fn settings_from(args: &Args) -> Result<TutorSettings> {
    let mut settings = TutorSettings::default().with_default_grade(args.grade);
    if let Some(model) = &args.model {
        settings = settings.with_model(model)?;
    }
    if let Some(base_url) = &args.base_url {
        settings = settings.with_base_url(base_url)?;
    }
    Ok(settings)
}

async fn submit(controller: &Arc<Controller>) -> Result<SubmitOutcome> {
    if !controller.can_submit() {
        return Ok(controller.submit().await);
    }

    let mut updates = controller.subscribe();
    let mut pending = tokio::spawn({
        let controller = Arc::clone(controller);
        async move { controller.submit().await }
    });

    tokio::select! {
        outcome = &mut pending => return outcome.context("submit task panicked"),
        loading = updates.wait_for(|state| state.loading) => {
            let started = loading.is_ok();
            drop(loading);
            if started {
                print!("{}", render::view(&controller.view()));
            }
        }
    }

    pending.await.context("submit task panicked")
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(err) = formula_tutor::telemetry::init() {
        eprintln!("{err}");
    }

    let args = Args::parse();
    let settings = settings_from(&args)?;
    info!(model = settings.model(), grade = %settings.default_grade(), "starting formula tutor");

    let controller = Arc::new(Controller::new(
        Composer::from_settings(&settings)?,
        Arc::new(EnvCredentials::new()),
        settings.default_grade(),
    ));

    println!("AI 수학 공식 도우미");
    println!("학년: {}", render::grades(controller.state().grade));
    println!("공식을 입력하세요. `:grade <학년>`, `:grades`, `:quit`\n");
    print!("{}", render::view(&controller.view()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("failed to read stdin")?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };

        match parse_command(&line) {
            Command::Quit => break,
            Command::Empty => {}
            Command::Grades => println!("{}", render::grades(controller.state().grade)),
            Command::Grade(label) => match label.parse::<GradeLevel>() {
                Ok(grade) => {
                    controller.select_grade(grade);
                    println!("{}", render::grades(grade));
                }
                Err(err) => warn!(%err, "grade not changed"),
            },
            Command::Formula(formula) => {
                controller.set_formula(formula);
                let outcome = submit(&controller).await?;
                debug!(?outcome, "submit settled");
                print!("{}", render::view(&controller.view()));
            }
        }
    }

    Ok(())
}
