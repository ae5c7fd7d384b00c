//! WhisperCircles Demo Application
//!
//! Runs one scripted session against the demo roster:
//! - Text, poll and voice submissions with their commit delay
//! - Voting and a rejected double vote
//! - The refresh loop fading posts out
//!
//! `WHISPER_SUBMISSION_LATENCY`, `WHISPER_TICK_INTERVAL` and
//! `WHISPER_MAX_CIRCLES` override the session defaults.

use std::time::Duration;

use tracing::info;
use whisper_author::{Draft, RecordingSession, SyntheticCapture};
use whisper_core::{ActorId, FadeDuration, RecordingCap};
use whisper_runtime::{init_logging, CircleView, LoggingConfig, Session, SessionConfig};
use whisper_state::PostKind;

const ALEX: ActorId = ActorId(1);
const MAYA: ActorId = ActorId(2);
const SAM: ActorId = ActorId(3);

fn print_circle(view: &CircleView) {
    let mood = view.mood.map(|t| t.as_str()).unwrap_or("quiet");
    println!("== {} [{}] ({} members)", view.name, mood, view.members.len());
    for post in &view.posts {
        println!(
            "   {:>3} {:<5} {:<8} {:>7}  {}",
            post.avatar,
            post.kind,
            post.tone.as_str(),
            post.remaining,
            post.content
        );
        if let Some(poll) = &post.poll {
            for option in &poll.options {
                println!(
                    "           - {:<10} {:>3}% ({})",
                    option.label, option.percent, option.votes
                );
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&LoggingConfig::default())?;

    let config = SessionConfig::from_env()?;
    let session = Session::demo(config)?;
    let circle = session
        .views(Some(ALEX))
        .first()
        .map(|v| v.id)
        .ok_or("demo session has no circle")?;
    session.add_member(circle, SAM)?;

    // Record a short voice nudge
    let mut recorder =
        RecordingSession::new(SyntheticCapture::new(800), RecordingCap::Seconds10);
    recorder.start()?;
    for _ in 0..3 {
        recorder.tick()?;
    }
    recorder.stop()?;
    let capture = recorder.take_capture().ok_or("recorder produced no capture")?;

    let submissions = vec![
        session.spawn_submission(
            circle,
            PostKind::Text,
            Draft::text("Just finished my first track, this is amazing!!"),
            FadeDuration::OneMinute,
            SAM,
        )?,
        session.spawn_submission(
            circle,
            PostKind::Poll,
            Draft::poll("Coffee or Tea?", ["Coffee", "Tea"]),
            FadeDuration::TwoMinutes,
            MAYA,
        )?,
        session.spawn_submission(
            circle,
            PostKind::Voice,
            Draft::voice(capture),
            FadeDuration::FiveMinutes,
            ALEX,
        )?,
    ];

    let invalid = Draft::poll("Pick one", ["", "A", ""]);
    if let Err(e) =
        session.begin_submission(circle, PostKind::Poll, invalid, FadeDuration::OneMinute, SAM)
    {
        println!("rejected poll: {e}");
    }

    let mut poll_id = None;
    for handle in submissions {
        let post = handle.await??;
        if post.kind() == PostKind::Poll {
            poll_id = Some(post.id);
        }
    }

    if let Some(poll) = poll_id {
        session.vote(poll, ALEX, 0)?;
        session.vote(poll, SAM, 1)?;
        if let Err(e) = session.vote(poll, ALEX, 1) {
            println!("rejected vote: {e}");
        }
    }

    let mut refresh = session.spawn_refresh(Some(ALEX));
    for _ in 0..2 {
        refresh.views.changed().await?;
    }
    let snapshot = refresh.views.borrow().clone();
    for view in snapshot.iter() {
        print_circle(view);
    }
    refresh.stop();

    tokio::time::sleep(Duration::from_millis(10)).await;
    info!(stats = ?session.stats(), "demo finished");
    println!("{}", session.snapshot_json(Some(ALEX))?);

    Ok(())
}
