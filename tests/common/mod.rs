//! In-process stand-in for the PHP API, served by actix-web on an ephemeral port.
//!
//! Records are kept as loose JSON the way the real server emits them:
//! numeric ids, `null` manager ids, counts as strings.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpResponse, HttpServer, web};
use serde_json::{Map, Value, json};

#[derive(Default)]
pub struct ApiState {
    pub employees: Vec<Value>,
    pub leaves: Vec<Value>,
    pub attendance: Vec<Value>,
    pub holidays: Vec<Value>,
    pub passwords: HashMap<String, String>,
    /// Every endpoint answers 500 while set
    pub outage: bool,
    /// Attendance upserts answer with the stored id
    pub upsert_ids: bool,
    pub next_id: u64,
}

impl ApiState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        100 + self.next_id
    }

    pub fn with_employee(mut self, employee: Value, password: &str) -> Self {
        let email = employee["email"].as_str().unwrap_or_default().to_string();
        self.passwords.insert(email, password.to_string());
        self.employees.push(employee);
        self
    }
}

type Shared = web::Data<Mutex<ApiState>>;

pub struct MockApi {
    pub base_url: String,
    state: Shared,
    handle: ServerHandle,
}

impl MockApi {
    pub async fn start(state: ApiState) -> MockApi {
        let state: Shared = web::Data::new(Mutex::new(state));
        let data = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .service(web::scope("/api").configure(routes))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind mock api");
        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        MockApi {
            base_url: format!("http://{addr}/api"),
            state,
            handle,
        }
    }

    pub fn state(&self) -> MutexGuard<'_, ApiState> {
        self.state.lock().unwrap()
    }

    pub async fn stop(self) {
        self.handle.stop(true).await;
    }
}

pub fn employee(id: u64, name: &str, role: &str, manager: Option<u64>) -> Value {
    json!({
        "id": id,
        "email": format!("{name}@example.com"),
        "name": name,
        "role": role,
        "department": "Engineering",
        "position": "Engineer",
        "joiningDate": "2023-03-01",
        "managerId": manager,
    })
}

/// alice (1, employee) reports to bob (2, manager) who reports to root (3, admin)
pub fn staffed() -> ApiState {
    ApiState::default()
        .with_employee(employee(1, "alice", "employee", Some(2)), "alice-pw")
        .with_employee(employee(2, "bob", "manager", Some(3)), "bob-pw")
        .with_employee(employee(3, "root", "admin", None), "root-pw")
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/auth.php").route(web::post().to(auth)))
        .service(web::resource("/employees.php").route(web::get().to(list_employees)))
        .service(
            web::resource("/leaves.php")
                .route(web::get().to(list_leaves))
                .route(web::post().to(create_leave))
                .route(web::patch().to(update_leave)),
        )
        .service(
            web::resource("/attendance.php")
                .route(web::get().to(list_attendance))
                .route(web::post().to(upsert_attendance)),
        )
        .service(
            web::resource("/holidays.php")
                .route(web::get().to(list_holidays))
                .route(web::post().to(create_holiday))
                .route(web::delete().to(remove_holiday)),
        );
}

fn id_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn outage() -> HttpResponse {
    HttpResponse::InternalServerError().json(json!({ "error": "database unavailable" }))
}

macro_rules! guard {
    ($state:expr) => {{
        let state = $state.lock().unwrap();
        if state.outage {
            return outage();
        }
        state
    }};
}

async fn auth(
    state: Shared,
    query: web::Query<HashMap<String, String>>,
    body: web::Json<Map<String, Value>>,
) -> HttpResponse {
    let mut state = guard!(state);
    let mut body = body.into_inner();
    let email = body.get("email").map(id_text).unwrap_or_default();
    let password = body.remove("password").map(|p| id_text(&p)).unwrap_or_default();

    match query.get("action").map(String::as_str) {
        Some("login") => {
            if state.passwords.get(&email) != Some(&password) {
                return HttpResponse::Unauthorized().json(json!({ "error": "Invalid credentials" }));
            }
            match state.employees.iter().find(|e| e["email"] == email.as_str()) {
                Some(user) => HttpResponse::Ok().json(json!({ "user": user })),
                None => HttpResponse::Unauthorized().json(json!({ "error": "Invalid credentials" })),
            }
        }
        Some("register") => {
            if state.passwords.contains_key(&email) {
                return HttpResponse::Conflict().json(json!({ "error": "Email already exists" }));
            }
            let id = state.next_id();
            body.insert("id".into(), json!(id));
            state.passwords.insert(email, password);
            state.employees.push(Value::Object(body));
            HttpResponse::Created().json(json!({ "success": true, "id": id }))
        }
        _ => HttpResponse::BadRequest().json(json!({ "error": "Invalid action" })),
    }
}

async fn list_employees(state: Shared) -> HttpResponse {
    let state = guard!(state);
    HttpResponse::Ok().json(&state.employees)
}

async fn list_leaves(state: Shared) -> HttpResponse {
    let state = guard!(state);
    HttpResponse::Ok().json(&state.leaves)
}

async fn create_leave(state: Shared, body: web::Json<Map<String, Value>>) -> HttpResponse {
    let mut state = guard!(state);
    let mut leave = body.into_inner();
    let id = state.next_id();
    leave.insert("id".into(), json!(id));
    leave.insert("status".into(), json!("pending"));
    // the PHP side hands counts back as strings
    if let Some(days) = leave.get("days").cloned() {
        leave.insert("days".into(), json!(id_text(&days)));
    }
    state.leaves.push(Value::Object(leave));
    HttpResponse::Created().json(json!({ "id": id }))
}

async fn update_leave(state: Shared, body: web::Json<Map<String, Value>>) -> HttpResponse {
    let mut state = guard!(state);
    let patch = body.into_inner();
    let Some(id) = patch.get("id").map(id_text) else {
        return HttpResponse::BadRequest().json(json!({ "error": "Missing id" }));
    };
    let Some(leave) = state
        .leaves
        .iter_mut()
        .find(|l| id_text(&l["id"]) == id)
        .and_then(Value::as_object_mut)
    else {
        return HttpResponse::NotFound().json(json!({ "error": "Leave request not found" }));
    };
    for (key, value) in patch {
        if key != "id" {
            leave.insert(key, value);
        }
    }
    HttpResponse::Ok().json(json!({ "success": true }))
}

async fn list_attendance(state: Shared) -> HttpResponse {
    let state = guard!(state);
    HttpResponse::Ok().json(&state.attendance)
}

async fn upsert_attendance(state: Shared, body: web::Json<Map<String, Value>>) -> HttpResponse {
    let mut state = guard!(state);
    let mut record = body.into_inner();
    let slot = state.attendance.iter().position(|r| match record.get("id") {
        Some(id) => id_text(&r["id"]) == id_text(id),
        None => {
            Some(id_text(&r["employeeId"])) == record.get("employeeId").map(id_text)
                && Some(&r["date"]) == record.get("date")
        }
    });
    let id = match slot {
        Some(i) => state.attendance[i]["id"].clone(),
        None => json!(state.next_id()),
    };
    record.insert("id".into(), id.clone());
    match slot {
        Some(i) => state.attendance[i] = Value::Object(record),
        None => state.attendance.push(Value::Object(record)),
    }

    if state.upsert_ids {
        HttpResponse::Ok().json(json!({ "success": true, "id": id }))
    } else {
        HttpResponse::Ok().json(json!({ "success": true }))
    }
}

async fn list_holidays(state: Shared) -> HttpResponse {
    let state = guard!(state);
    HttpResponse::Ok().json(&state.holidays)
}

async fn create_holiday(state: Shared, body: web::Json<Map<String, Value>>) -> HttpResponse {
    let mut state = guard!(state);
    let mut holiday = body.into_inner();
    let id = state.next_id();
    holiday.insert("id".into(), json!(id));
    state.holidays.push(Value::Object(holiday));
    HttpResponse::Created().json(json!({ "id": id }))
}

async fn remove_holiday(state: Shared, query: web::Query<HashMap<String, String>>) -> HttpResponse {
    let mut state = guard!(state);
    let Some(id) = query.get("id") else {
        return HttpResponse::BadRequest().json(json!({ "error": "Missing id" }));
    };
    state.holidays.retain(|h| &id_text(&h["id"]) != id);
    HttpResponse::Ok().json(json!({ "success": true }))
}
