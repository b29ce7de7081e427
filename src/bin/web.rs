//! Single binary web server: operator panel at `/`, stream overlay at `/overlay`,
//! JSON API under `/api`.
//! Run with: cargo run --bin web
//! Listens on 127.0.0.1:8080 by default. Override with env: HOST, PORT.
//! GUESSWHO_* variables prefill the operator fields (see `config`).

use actix_files::Files;
use actix_web::{
    get, post, put,
    web::{self, Data, Json},
    App, HttpResponse, HttpServer, Responder,
};
use guess_who_console::{
    reload, AppConfig, GameController, GoogleSheetsClient, LoadForm, Selector,
};
use serde::Deserialize;
use std::sync::Mutex;

/// One controller for the whole process; handlers run one at a time behind the mutex.
type AppState = Data<Mutex<GameController<GoogleSheetsClient>>>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct SelectPlayerBody {
    index: usize,
}

#[derive(Deserialize)]
struct RoundBody {
    round: u32,
}

#[derive(Deserialize)]
struct OverlaySelectBody {
    selector: Selector,
    index: usize,
}

fn bad_request(e: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "guess-who-console",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Operator panel state: fields, status line, player list and the selected player.
#[get("/api/operator")]
async fn api_operator(state: AppState) -> HttpResponse {
    let g = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(g.operator_snapshot())
}

/// Reload the roster from the spreadsheet. Auth and query block, so this runs on the blocking pool.
#[post("/api/operator/load")]
async fn api_load(state: AppState, body: Json<LoadForm>) -> HttpResponse {
    let form = body.into_inner();
    let state = state.clone();
    let result = web::block(move || {
        let mut g = state.lock().map_err(|_| "lock error")?;
        reload(&mut *g, form);
        Ok::<_, &'static str>(g.operator_snapshot())
    })
    .await;
    match result {
        Ok(Ok(snapshot)) => HttpResponse::Ok().json(snapshot),
        Ok(Err(e)) => HttpResponse::InternalServerError().body(e),
        Err(e) => {
            log::error!("Roster load task failed: {}", e);
            HttpResponse::InternalServerError().body("load failed")
        }
    }
}

/// Select a player in the operator list (index 0 clears the view).
#[post("/api/operator/select")]
async fn api_operator_select(state: AppState, body: Json<SelectPlayerBody>) -> HttpResponse {
    let mut g = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.select_operator_player(body.index) {
        Ok(_) => HttpResponse::Ok().json(g.operator_snapshot()),
        Err(e) => bad_request(e),
    }
}

/// Set the bracket round stamped onto recorded guesses.
#[put("/api/operator/round")]
async fn api_set_round(state: AppState, body: Json<RoundBody>) -> HttpResponse {
    let mut g = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.set_round(body.round) {
        Ok(()) => HttpResponse::Ok().json(g.operator_snapshot()),
        Err(e) => bad_request(e),
    }
}

/// Overlay state: the three lists, current selections and which controls are enabled.
#[get("/api/overlay")]
async fn api_overlay(state: AppState) -> HttpResponse {
    let g = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(g.overlay_snapshot())
}

#[post("/api/overlay/select")]
async fn api_overlay_select(state: AppState, body: Json<OverlaySelectBody>) -> HttpResponse {
    let mut g = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.overlay_select(body.selector, body.index) {
        Ok(()) => HttpResponse::Ok().json(g.overlay_snapshot()),
        Err(e) => bad_request(e),
    }
}

/// Check the selected guess (Ready only); locks the selectors.
#[post("/api/overlay/check")]
async fn api_overlay_check(state: AppState) -> HttpResponse {
    let mut g = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.check() {
        Ok(_) => HttpResponse::Ok().json(g.overlay_snapshot()),
        Err(e) => bad_request(e),
    }
}

/// Record the checked guess into the roster (once per check).
#[post("/api/overlay/record")]
async fn api_overlay_record(state: AppState) -> HttpResponse {
    let mut g = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.record() {
        Ok(_) => HttpResponse::Ok().json(g.overlay_snapshot()),
        Err(e) => bad_request(e),
    }
}

/// Back to Idle: placeholders everywhere, selectors unlocked.
#[post("/api/overlay/clear")]
async fn api_overlay_clear(state: AppState) -> HttpResponse {
    let mut g = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    g.clear();
    HttpResponse::Ok().json(g.overlay_snapshot())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env();
    let state: AppState = Data::new(Mutex::new(GameController::with_form(
        GoogleSheetsClient::new(),
        config.prefill.clone(),
    )));

    if config.autoload {
        log::info!("GUESSWHO_AUTOLOAD set; loading roster before serving");
        let state_load = state.clone();
        let form = config.prefill.clone();
        let loaded = web::block(move || match state_load.lock() {
            Ok(mut g) => {
                reload(&mut *g, form);
            }
            Err(_) => log::error!("lock error during startup load"),
        })
        .await;
        if let Err(e) = loaded {
            log::error!("Startup load failed: {}", e);
        }
    }

    let bind = (config.host.as_str(), config.port);
    log::info!("Operator panel at http://{}:{}/", bind.0, bind.1);
    log::info!("Stream overlay at http://{}:{}/overlay", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .route("/", web::get().to(serve_operator))
            .route("/overlay", web::get().to(serve_overlay))
            .service(api_health)
            .service(favicon)
            .service(api_operator)
            .service(api_load)
            .service(api_operator_select)
            .service(api_set_round)
            .service(api_overlay)
            .service(api_overlay_select)
            .service(api_overlay_check)
            .service(api_overlay_record)
            .service(api_overlay_clear)
            .service(Files::new("/static", "static"))
    })
    .bind(bind)?
    .run()
    .await
}

async fn serve_operator() -> HttpResponse {
    let html = include_str!("../../templates/operator.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}

async fn serve_overlay() -> HttpResponse {
    let html = include_str!("../../templates/overlay.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
