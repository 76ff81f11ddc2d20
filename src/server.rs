use std::{sync::Arc, time::Instant};

use actix_web::{
    get, post,
    rt::{spawn, time},
    web, App, HttpResponse, HttpServer, Responder,
};
use tracing::{error, info, warn};

use crate::{
    config::AppConfig,
    hint::HintGenerator,
    puzzle::{grade, Puzzle, Submission},
    store::{JsonFileStore, PuzzleStore},
};

pub const SUCCESS_MESSAGE: &str = "Congratulations!";
pub const RETRY_MESSAGE: &str = "That's not quite right. Try again!";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PuzzleStore>,
    pub hints: Arc<HintGenerator>,
}

#[derive(serde::Deserialize)]
struct HintPayload {
    #[serde(default = "default_level")]
    level: String,
}

fn default_level() -> String {
    "beginner".to_string()
}

#[derive(serde::Deserialize)]
struct SubmitPayload {
    #[serde(default)]
    submission: serde_json::Value,
}

fn find_puzzle(state: &AppState, key: &str) -> Result<Arc<Puzzle>, HttpResponse> {
    match state.store.get_puzzle(key) {
        Ok(Some(puzzle)) => Ok(puzzle),
        Ok(None) => {
            warn!(date = %key, "Puzzle not found");
            Err(HttpResponse::NotFound().json(serde_json::json!({
                "error": "Puzzle not found"
            })))
        }
        Err(err) => {
            error!(date = %key, error = %err, "Puzzle store failure");
            Err(HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Puzzle data unavailable"
            })))
        }
    }
}

#[get("/api/puzzle/{date}")]
async fn puzzle_handler(state: web::Data<AppState>, date: web::Path<String>) -> impl Responder {
    let request_start = Instant::now();
    let puzzle = match find_puzzle(&state, &date) {
        Ok(puzzle) => puzzle,
        Err(response) => return response,
    };

    let words = puzzle.shuffled_words(&mut rand::thread_rng());
    info!(
        date = %puzzle.date,
        elapsed_ms = request_start.elapsed().as_millis(),
        "Puzzle served"
    );

    HttpResponse::Ok().json(serde_json::json!({
        "id": puzzle.id,
        "date": puzzle.date.to_string(),
        "title": &puzzle.title,
        "difficulty": &puzzle.difficulty,
        "words": words,
    }))
}

#[get("/api/puzzles")]
async fn archive_handler(state: web::Data<AppState>) -> impl Responder {
    let request_start = Instant::now();
    match state.store.get_all_puzzles() {
        Ok(puzzles) => {
            let entries: Vec<_> = puzzles
                .iter()
                .map(|puzzle| {
                    serde_json::json!({
                        "id": puzzle.id,
                        "date": puzzle.date.to_string(),
                        "title": &puzzle.title,
                        "difficulty": &puzzle.difficulty,
                    })
                })
                .collect();
            info!(
                puzzles = entries.len(),
                elapsed_ms = request_start.elapsed().as_millis(),
                "Archive served"
            );
            HttpResponse::Ok().json(entries)
        }
        Err(err) => {
            error!(
                error = %err,
                elapsed_ms = request_start.elapsed().as_millis(),
                "Puzzle store failure"
            );
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Puzzle data unavailable"
            }))
        }
    }
}

#[post("/api/hint/{date}")]
async fn hint_handler(
    state: web::Data<AppState>,
    date: web::Path<String>,
    payload: Option<web::Json<HintPayload>>,
) -> impl Responder {
    let request_start = Instant::now();
    let puzzle = match find_puzzle(&state, &date) {
        Ok(puzzle) => puzzle,
        Err(response) => return response,
    };

    let level = payload.map_or_else(default_level, |payload| payload.into_inner().level);
    let hint = state.hints.generate(&puzzle, &level).await;

    info!(
        date = %puzzle.date,
        %level,
        elapsed_ms = request_start.elapsed().as_millis(),
        "Hint served"
    );

    HttpResponse::Ok().json(serde_json::json!({ "hint": hint }))
}

#[post("/api/submit/{date}")]
async fn submit_handler(
    state: web::Data<AppState>,
    date: web::Path<String>,
    payload: web::Json<SubmitPayload>,
) -> impl Responder {
    let request_start = Instant::now();
    let puzzle = match find_puzzle(&state, &date) {
        Ok(puzzle) => puzzle,
        Err(response) => return response,
    };

    let submission = Submission::from_json(&payload.submission);
    let result = grade(&submission, &puzzle);

    info!(
        date = %puzzle.date,
        groups = submission.groups().len(),
        matched = result.matched.len(),
        correct = result.correct,
        elapsed_ms = request_start.elapsed().as_millis(),
        "Submission checked"
    );

    let message = if result.correct {
        SUCCESS_MESSAGE
    } else {
        RETRY_MESSAGE
    };

    HttpResponse::Ok().json(serde_json::json!({
        "correct": result.correct,
        "message": message,
    }))
}

#[get("/health")]
async fn health_handler(state: web::Data<AppState>) -> impl Responder {
    match state.store.collection() {
        Ok(collection) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "puzzles": collection.len(),
            "hint_completion": state.hints.uses_completion(),
        })),
        Err(err) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "degraded",
            "error": err.to_string(),
        })),
    }
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(puzzle_handler)
        .service(archive_handler)
        .service(hint_handler)
        .service(submit_handler)
        .service(health_handler);
}

pub async fn run_server(config: Arc<AppConfig>) -> std::io::Result<()> {
    let store = Arc::new(JsonFileStore::new(
        config.data_file.clone(),
        config.shape,
        config.store_ttl,
    ));
    match store.collection() {
        Ok(collection) => info!(puzzles = collection.len(), "Puzzle store ready"),
        Err(err) => error!(path = %store.path().display(), error = %err, "Puzzle store failed to load"),
    }

    let state = AppState {
        store: store.clone(),
        hints: Arc::new(HintGenerator::new(&config.hints)),
    };

    let cleanup_interval = config.cleanup_interval;
    spawn(async move {
        let mut interval = time::interval(cleanup_interval);
        loop {
            interval.tick().await;
            let (removed, remaining) = store.cleanup();
            tracing::debug!(removed, remaining, "Cache cleanup completed");
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(routes)
    })
    .bind((config.host.clone(), config.port))?
    .workers(config.workers)
    .run()
    .await
}
