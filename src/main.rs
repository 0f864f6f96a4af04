//! Chikitsak - terminal health companion
//!
//! Line-oriented front-end over the chat workspace, the symptom intake
//! wizard and the records export.

use chikitsak_client::attachment::ImageAttachment;
use chikitsak_client::auth::{self, Credentials, LoginOutcome};
use chikitsak_client::calculators::{self, ActivityLevel, Sex};
use chikitsak_client::catalog::{BodyRegion, DurationBucket, LevelOfCare};
use chikitsak_client::intake::{IntakeEffect, IntakeEvent, IntakeStep, IntakeWizard, WizardProgress};
use chikitsak_client::records::HealthRecords;
use chikitsak_client::store::{ChatMode, Role};
use chikitsak_client::triage::Analysis;
use chikitsak_client::workspace::{PendingReply, TokioScheduler};
use chikitsak_client::{
    AppStore, ClientConfig, HttpBackend, LoggingBackend, OutgoingMessage, Preferences, SharedStore,
    WorkspaceController,
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type Controller = WorkspaceController<LoggingBackend<HttpBackend>, TokioScheduler>;
type Input = Lines<BufReader<Stdin>>;

const DISCLAIMER: &str = "Chikitsak provides general health information, not a diagnosis. \
In an emergency, call your local emergency number. Type 'agree' to continue.";

const HELP: &str = "\
Commands:
  <text>                 send a message to the active chat
  /attach <path> [text]  send an image with optional text
  /new [mode]            start a new chat (symptom, lab, medication)
  /mode <mode>           switch the workspace tool
  /sessions              list chats
  /switch <n>            open chat n
  /delete <n>            delete chat n
  /intake                guided symptom check
  /calc <name> <values>  bmi, calories, heart or water (/calc alone for usage)
  /insights              show the latest analysis
  /login <email> <pass>  sign in
  /logout                sign out
  /lang <code>           set the reply language
  /export [dir]          write the health records summary
  /quit                  exit";

#[tokio::main]
#[allow(clippy::too_many_lines)]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they do not interleave with the conversation
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chikitsak_client=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = ClientConfig::from_env();
    let mut preferences = Preferences::load(&config.preferences_path)?;

    let mut store = AppStore::with_welcome_session();
    store.set_language(preferences.language());
    let store = SharedStore::new(store);

    let backend = LoggingBackend::new(HttpBackend::new(&config)?);
    tracing::info!(api_base = %config.api_base, language = %preferences.language(), "Client started");
    let controller: Controller = WorkspaceController::new(store, backend, TokioScheduler);

    let mut input = BufReader::new(tokio::io::stdin()).lines();

    println!("{DISCLAIMER}");
    while !controller.store().lock().disclaimer_accepted() {
        match input.next_line().await? {
            Some(line) if line.trim().eq_ignore_ascii_case("agree") => {
                controller.store().with(AppStore::accept_disclaimer);
            }
            Some(_) => println!("{DISCLAIMER}"),
            None => return Ok(()),
        }
    }

    print_transcript(&controller);
    println!("Type /help for commands.");

    while let Some(line) = input.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        match command {
            "/quit" | "/exit" => break,
            "/help" => println!("{HELP}"),
            "/new" => {
                let mode = ChatMode::from_param(rest).unwrap_or_default();
                controller.set_mode(mode);
                controller.clear_interview();
                controller.create_session("New Chat", mode);
                println!("Started a new {mode} chat.");
            }
            "/mode" => match ChatMode::from_param(rest) {
                Some(mode) => {
                    controller.set_mode(mode);
                    println!("{}", mode.placeholder());
                }
                None => println!("Unknown mode '{rest}'. Use symptom, lab or medication."),
            },
            "/sessions" => list_sessions(&controller),
            "/switch" => match session_id_at(&controller, rest) {
                Some(id) => {
                    controller.select_session(&id)?;
                    print_transcript(&controller);
                }
                None => println!("No chat numbered '{rest}'."),
            },
            "/delete" => match session_id_at(&controller, rest) {
                Some(id) => {
                    controller.delete_session(&id)?;
                    println!("Chat deleted.");
                }
                None => println!("No chat numbered '{rest}'."),
            },
            "/intake" => run_intake(&mut input, &controller).await?,
            "/insights" => print_insights(&controller),
            "/calc" => println!("{}", calculate(rest)),
            "/login" => {
                let (email, password) = rest.split_once(' ').unwrap_or((rest, ""));
                let credentials = Credentials::new(email, password.trim());
                match auth::login(controller.backend(), controller.store(), &credentials).await {
                    Ok(LoginOutcome::Authenticated) => println!("Signed in."),
                    Ok(LoginOutcome::Offline) => println!("Backend unreachable; signed in offline."),
                    Err(e) => println!("{e}"),
                }
            }
            "/logout" => {
                auth::logout(controller.store());
                println!("Signed out.");
            }
            "/lang" if !rest.is_empty() => {
                preferences.set_language(rest)?;
                controller.store().with(|s| s.set_language(rest));
                println!("Language set to {rest}.");
            }
            "/export" => {
                let dir = if rest.is_empty() { "." } else { rest };
                let today = chrono::Local::now().date_naive();
                match HealthRecords::sample().export_to_dir(dir, today).await {
                    Ok(path) => println!("Saved {}", path.display()),
                    Err(e) => println!("{e}"),
                }
            }
            "/attach" => {
                let (path, text) = rest.split_once(' ').unwrap_or((rest, ""));
                match ImageAttachment::from_path(path).await {
                    Ok(image) => {
                        let message = OutgoingMessage::text(text).with_attachment(image);
                        send_and_print(&controller, |c| c.send_message(message)).await;
                    }
                    Err(e) => println!("{e}"),
                }
            }
            _ if command.starts_with('/') => println!("Unknown command. Type /help."),
            _ => {
                let message = OutgoingMessage::text(line);
                send_and_print(&controller, |c| c.send_message(message)).await;
            }
        }
    }

    Ok(())
}

/// Send, wait for the reply, then print the messages it added
async fn send_and_print(
    controller: &Controller,
    send: impl FnOnce(&Controller) -> Result<PendingReply, chikitsak_client::WorkspaceError>,
) {
    let before = message_count(controller);
    match send(controller) {
        Ok(pending) => {
            println!("...");
            pending.finished().await;
            print_since(controller, before);
        }
        Err(e) => println!("{e}"),
    }
}

fn message_count(controller: &Controller) -> usize {
    controller
        .store()
        .with(|s| s.active_session().map_or(0, |session| session.messages.len()))
}

fn print_since(controller: &Controller, from: usize) {
    let emergency = controller.store().with(|s| {
        if let Some(session) = s.active_session() {
            for message in session.messages.iter().skip(from) {
                if message.role == Role::Ai {
                    println!("AI: {}", message.content);
                }
            }
        }
        let active = s.emergency_active();
        s.dismiss_emergency();
        active
    });
    if emergency {
        println!("!!! This may be an emergency. Call your local emergency number now. !!!");
    }
}

fn print_transcript(controller: &Controller) {
    controller.store().with(|s| {
        if let Some(session) = s.active_session() {
            println!("== {} ({}) ==", session.title, session.mode);
            for message in &session.messages {
                let who = match message.role {
                    Role::User => "You",
                    Role::Ai => "AI",
                };
                println!("{who}: {}", message.content);
            }
        }
    });
}

fn list_sessions(controller: &Controller) {
    controller.store().with(|s| {
        let active = s.active_chat_id().map(String::from);
        for (n, session) in s.sessions().iter().enumerate() {
            let marker = if active.as_deref() == Some(session.id.as_str()) { "*" } else { " " };
            println!(
                "{marker} {}. {} [{}] {} messages",
                n + 1,
                session.title,
                session.mode,
                session.messages.len()
            );
        }
    });
}

fn session_id_at(controller: &Controller, number: &str) -> Option<String> {
    let index = number.parse::<usize>().ok()?.checked_sub(1)?;
    controller
        .store()
        .with(|s| s.sessions().get(index).map(|session| session.id.clone()))
}

fn print_insights(controller: &Controller) {
    let insights = controller.store().with(|s| s.insights().clone());
    println!("Triage: {}  AI confidence: {}%", insights.triage_level, insights.ai_confidence);
    for cause in &insights.causes {
        println!("  {} {}% ({} risk)", cause.name, cause.probability, cause.risk);
    }
    if !insights.red_flags.is_empty() {
        println!("Red flags: {}", insights.red_flags.join(", "));
    }
    println!("Next steps: {}", insights.next_steps.join("; "));
}

fn print_analysis(analysis: &Analysis) {
    println!("Triage: {}  Confidence: {}%", analysis.triage, analysis.confidence);
    for condition in &analysis.conditions {
        println!("  {} {}% ({} risk)", condition.name, condition.probability, condition.risk);
    }
}

fn print_intake_step(wizard: &IntakeWizard) {
    let progress = wizard.progress();
    println!("-- {} ({}%) --", progress.step, progress.progress_percent());
    match progress.step {
        IntakeStep::Symptoms => {
            let selected: Vec<_> = progress.symptoms.iter().collect();
            println!("Selected: {}", selected.join(", "));
            match progress.active_region {
                Some(region) => {
                    println!("{region}:");
                    for (n, symptom) in progress.region_symptoms().iter().enumerate() {
                        println!("  {}. {symptom}", n + 1);
                    }
                }
                None => {
                    for (n, region) in BodyRegion::ALL.iter().enumerate() {
                        println!("  region {}: {region}", n + 1);
                    }
                }
            }
            println!("Type to search, a number to add a listed symptom, +name to add, -name to remove.");
            println!("region <n> to browse a body region, region clear to stop.");
        }
        IntakeStep::LevelOfCare => {
            for (n, level) in LevelOfCare::ALL.iter().enumerate() {
                println!("  {}. {level}", n + 1);
            }
        }
        IntakeStep::Details => {
            println!("severity <0-10> (now {})", progress.severity);
            for (n, bucket) in DurationBucket::ALL.iter().enumerate() {
                println!("  duration {}: {bucket}", n + 1);
            }
            for (n, question) in progress.context_questions().iter().enumerate() {
                let mark = if progress.answer(question) { "x" } else { " " };
                println!("  [{mark}] yes/no {}: {question}", n + 1);
            }
        }
        IntakeStep::Results => println!("Type 'finish' to discuss these results in chat."),
    }
    println!("next, back, cancel");
}

/// Turn a line typed during the intake into a wizard event
fn intake_event(wizard: &IntakeWizard, line: &str) -> Option<IntakeEvent> {
    let progress = wizard.progress();
    let (word, arg) = line.split_once(' ').unwrap_or((line, ""));
    let number = |s: &str| s.trim().parse::<usize>().ok().and_then(|n| n.checked_sub(1));

    match (progress.step, word) {
        (_, "next") => Some(IntakeEvent::Next),
        (_, "back") => Some(IntakeEvent::Back),
        (IntakeStep::Results, "finish") => Some(IntakeEvent::Finish),
        (IntakeStep::Symptoms, "region") => match arg.trim() {
            "" | "clear" => Some(IntakeEvent::ClearRegion),
            arg => number(arg)
                .and_then(|i| BodyRegion::ALL.get(i).copied())
                .map(IntakeEvent::SelectRegion),
        },
        (IntakeStep::Symptoms, _) => {
            if let Some(name) = line.strip_prefix('+') {
                Some(IntakeEvent::AddSymptom(name.trim().to_string()))
            } else if let Some(name) = line.strip_prefix('-') {
                Some(IntakeEvent::RemoveSymptom(name.trim().to_string()))
            } else if let Some(index) = number(line) {
                listed_symptoms(progress)
                    .get(index)
                    .map(|s| IntakeEvent::AddSymptom((*s).to_string()))
            } else {
                Some(IntakeEvent::SearchChanged(line.to_string()))
            }
        }
        (IntakeStep::LevelOfCare, _) => number(line)
            .and_then(|i| LevelOfCare::ALL.get(i).copied())
            .map(IntakeEvent::SelectLevelOfCare),
        (IntakeStep::Details, "severity") => arg.trim().parse().ok().map(IntakeEvent::SetSeverity),
        (IntakeStep::Details, "duration") => number(arg)
            .and_then(|i| DurationBucket::ALL.get(i).copied())
            .map(IntakeEvent::SelectDuration),
        (IntakeStep::Details, "yes" | "no") => {
            let questions = progress.context_questions();
            number(arg).and_then(|i| questions.get(i)).map(|question| IntakeEvent::AnswerContext {
                question: (*question).to_string(),
                answer: word == "yes",
            })
        }
        _ => None,
    }
}

/// Symptoms a typed number picks from: search results while searching,
/// otherwise the browsed region
fn listed_symptoms(progress: &WizardProgress) -> Vec<&'static str> {
    if progress.search_query.trim().is_empty() {
        progress.region_symptoms()
    } else {
        progress.search_results()
    }
}

async fn run_intake(input: &mut Input, controller: &Controller) -> Result<(), Box<dyn std::error::Error>> {
    // Symptoms already given to the chat interview start out selected
    let mut wizard = controller.store().with(|s| IntakeWizard::from_store(s));
    print_intake_step(&wizard);

    while let Some(line) = input.next_line().await? {
        let line = line.trim();
        if line == "cancel" {
            println!("Symptom check cancelled.");
            return Ok(());
        }
        let Some(event) = intake_event(&wizard, line) else {
            println!("Not understood here.");
            continue;
        };
        let searching = matches!(event, IntakeEvent::SearchChanged(_));

        match wizard.apply_shared(controller.store(), event) {
            Ok(effects) => {
                for effect in effects {
                    match effect {
                        IntakeEffect::ShowResults(analysis) => print_analysis(&analysis),
                        IntakeEffect::HandOff { query } => {
                            send_and_print(controller, |c| c.open_with_query(Some("symptom"), &query)).await;
                            return Ok(());
                        }
                    }
                }
            }
            Err(e) => println!("{e}"),
        }

        if searching {
            for (n, result) in wizard.progress().search_results().iter().enumerate() {
                println!("  {}. {result}", n + 1);
            }
        } else {
            print_intake_step(&wizard);
        }
    }
    Ok(())
}

const CALC_USAGE: &str = "\
Usage:
  /calc bmi <height cm> <weight kg>
  /calc calories <age> <weight kg> <male|female> [sedentary|light|moderate|active|veryActive]
  /calc heart <systolic> <cholesterol> [smoker]
  /calc water <weight kg> [exercise minutes, default 30]";

/// Run a calculator from `/calc` arguments and describe the result
fn calculate(args: &str) -> String {
    let words: Vec<&str> = args.split_whitespace().collect();
    let float = |i: usize| words.get(i).and_then(|w| w.parse::<f64>().ok()).unwrap_or(0.0);
    let whole = |i: usize| words.get(i).and_then(|w| w.parse::<u32>().ok()).unwrap_or(0);

    let result = match words.first().copied() {
        Some("bmi") => calculators::bmi(float(1), float(2)).map(|bmi| format!("BMI {bmi}")),
        Some("calories") => {
            let sex = words.get(3).and_then(|w| Sex::from_param(w)).unwrap_or_default();
            let activity = words.get(4).map_or_else(ActivityLevel::default, |w| ActivityLevel::from_param(w));
            calculators::daily_calories(whole(1), float(2), sex, activity)
                .map(|kcal| format!("Daily Calorie Need: {kcal:.0} kcal"))
        }
        Some("heart") => {
            let smoker = words.get(3).is_some_and(|w| w.eq_ignore_ascii_case("smoker"));
            calculators::heart_risk(whole(1), whole(2), smoker).map(|risk| risk.to_string())
        }
        Some("water") => {
            let minutes = words.get(2).and_then(|w| w.parse().ok()).unwrap_or(30);
            calculators::daily_water_litres(float(1), minutes)
                .map(|litres| format!("Daily Water Intake: {litres:.1} L"))
        }
        _ => return CALC_USAGE.to_string(),
    };
    result.unwrap_or_else(|| CALC_USAGE.to_string())
}
