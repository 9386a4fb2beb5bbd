//! In-process stand-in for the lead backend used by integration tests.

#![allow(dead_code)]

use std::sync::Mutex;

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde_json::{Value, json};

pub const TOKEN: &str = "stub-token";
pub const PASSWORD: &str = "secret";
pub const CUSTOMER_ID: &str = "c1";

pub struct BackendState {
    pub customer: Value,
    pub leads: Vec<Value>,
    pub filter_queries: Vec<String>,
}

impl BackendState {
    fn lead(&self, id: &str) -> Option<Value> {
        self.leads.iter().find(|l| l["_id"] == id).cloned()
    }

    fn list_contains(&self, key: &str, id: &str) -> bool {
        self.customer[key]
            .as_array()
            .is_some_and(|items| items.iter().any(|item| item == id || item["_id"] == id))
    }
}

pub fn lead(id: &str, area: &str, bhk: &str, credit: u64) -> Value {
    json!({
        "_id": id,
        "id": id,
        "type": "Residential Rent",
        "subType": "Apartment",
        "bhk": bhk,
        "areas": area,
        "occupancyType": "Family",
        "priceRange": {"min": 15000, "max": 25000},
        "shiftingDate": "2024-06-01",
        "createdOn": "2024-05-01T09:00:00Z",
        "credit": credit,
        "name": format!("Owner {id}"),
        "number": "9800000000"
    })
}

pub fn default_state() -> BackendState {
    BackendState {
        customer: json!({
            "_id": CUSTOMER_ID,
            "id": CUSTOMER_ID,
            "name": "Asha Patel",
            "number": "9876543210",
            "credit": 500,
            "purchasedLeads": [],
            "savedLeads": [],
            "createdAt": "2024-01-10T00:00:00Z"
        }),
        leads: vec![
            lead("l1", "Shela", "2BHK", 100),
            lead("l2", "Bopal", "3BHK", 150),
            lead("l3", "Shela", "1BHK", 900),
        ],
        filter_queries: Vec::new(),
    }
}

type State = web::Data<Mutex<BackendState>>;

fn authorized(req: &HttpRequest) -> bool {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .is_some_and(|h| h == format!("Bearer {TOKEN}"))
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(json!({"success": false, "error": "Invalid or expired token"}))
}

fn failure(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({"success": false, "error": message}))
}

async fn login(state: State, body: web::Json<Value>) -> HttpResponse {
    if body["password"] != PASSWORD {
        return unauthorized_login();
    }
    let state = state.lock().unwrap();
    HttpResponse::Ok().json(json!({"success": true, "token": TOKEN, "data": state.customer}))
}

fn unauthorized_login() -> HttpResponse {
    HttpResponse::Unauthorized().json(json!({"success": false, "error": "Invalid credentials"}))
}

async fn customer(req: HttpRequest, state: State, id: web::Path<String>) -> HttpResponse {
    if !authorized(&req) {
        return unauthorized();
    }
    if id.as_str() != CUSTOMER_ID {
        return HttpResponse::NotFound().json(json!({"success": false, "error": "Customer not found"}));
    }
    let state = state.lock().unwrap();
    HttpResponse::Ok().json(json!({"success": true, "data": state.customer}))
}

async fn all_leads(req: HttpRequest, state: State) -> HttpResponse {
    if !authorized(&req) {
        return unauthorized();
    }
    let state = state.lock().unwrap();
    HttpResponse::Ok().json(json!({"success": true, "data": state.leads, "total": state.leads.len()}))
}

async fn filter_leads(req: HttpRequest, state: State) -> HttpResponse {
    if !authorized(&req) {
        return unauthorized();
    }
    let mut state = state.lock().unwrap();
    state.filter_queries.push(req.query_string().to_string());

    let pairs: Vec<(String, String)> =
        serde_html_form::from_str(req.query_string()).unwrap_or_default();
    let param = |key: &str| pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone());
    let page: usize = param("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let limit: usize = param("limit").and_then(|p| p.parse().ok()).unwrap_or(25);

    let matching: Vec<Value> = state
        .leads
        .iter()
        .filter(|lead| param("areas").is_none_or(|a| lead["areas"] == a.as_str()))
        .filter(|lead| {
            param("bhk").is_none_or(|tags| tags.split(',').any(|t| lead["bhk"] == t))
        })
        .cloned()
        .collect();
    let total = matching.len();
    let pages = total.div_ceil(limit).max(1);
    let items: Vec<Value> = matching.into_iter().skip((page - 1) * limit).take(limit).collect();

    HttpResponse::Ok().json(json!({
        "success": true,
        "data": items,
        "total": total,
        "pages": pages,
        "currentPage": page
    }))
}

async fn purchase(req: HttpRequest, state: State, body: web::Json<Value>) -> HttpResponse {
    if !authorized(&req) {
        return unauthorized();
    }
    let mut state = state.lock().unwrap();
    let lead_id = body["leadId"].as_str().unwrap_or_default().to_string();
    let Some(lead) = state.lead(&lead_id) else {
        return HttpResponse::NotFound().json(json!({"success": false, "error": "Lead not found"}));
    };
    if state.list_contains("purchasedLeads", &lead_id) {
        return failure("Lead already purchased");
    }
    let price = lead["credit"].as_u64().unwrap_or_default();
    let credit = state.customer["credit"].as_u64().unwrap_or_default();
    if credit < price {
        return failure("Insufficient credit");
    }

    state.customer["credit"] = json!(credit - price);
    if let Some(purchased) = state.customer["purchasedLeads"].as_array_mut() {
        purchased.push(lead);
    }
    HttpResponse::Ok().json(json!({"success": true, "message": "Lead purchased"}))
}

async fn save_lead(req: HttpRequest, state: State, body: web::Json<Value>) -> HttpResponse {
    if !authorized(&req) {
        return unauthorized();
    }
    let mut state = state.lock().unwrap();
    let lead_id = body["leadId"].as_str().unwrap_or_default().to_string();
    if let Some(saved) = state.customer["savedLeads"].as_array_mut() {
        if let Some(pos) = saved.iter().position(|id| id == lead_id.as_str()) {
            saved.remove(pos);
        } else {
            saved.push(json!(lead_id));
        }
    }
    HttpResponse::Ok().json(json!({"success": true}))
}

/// A running stub backend.
pub struct StubBackend {
    pub url: String,
    pub state: web::Data<Mutex<BackendState>>,
}

impl StubBackend {
    pub fn filter_queries(&self) -> Vec<String> {
        self.state.lock().unwrap().filter_queries.clone()
    }

    pub fn customer(&self) -> Value {
        self.state.lock().unwrap().customer.clone()
    }
}

pub async fn spawn_backend(state: BackendState) -> StubBackend {
    let data = web::Data::new(Mutex::new(state));
    let shared = data.clone();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(shared.clone())
            .route("/api/leads/customer/login", web::post().to(login))
            .route("/api/leads/customer/{id}", web::get().to(customer))
            .route("/api/leads/admin/all", web::get().to(all_leads))
            .route("/api/leads/filter", web::get().to(filter_leads))
            .route("/api/leads/purchase", web::post().to(purchase))
            .route("/api/leads/save-lead", web::post().to(save_lead))
    })
    .workers(1)
    .disable_signals()
    .bind(("127.0.0.1", 0))
    .unwrap();

    let port = server.addrs()[0].port();
    actix_web::rt::spawn(server.run());

    StubBackend {
        url: format!("http://127.0.0.1:{port}"),
        state: data,
    }
}
