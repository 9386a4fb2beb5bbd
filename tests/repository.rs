mod common;

use std::time::Duration;

use leads_dashboard::domain::customer::Credentials;
use leads_dashboard::domain::filter::LeadFilter;
use leads_dashboard::domain::types::{CustomerId, LeadId, NonEmptyString};
use leads_dashboard::repository::errors::RepositoryError;
use leads_dashboard::repository::{
    AuthGateway, CustomerReader, HttpRepository, LeadListQuery, LeadReader, LeadWriter,
};

use common::{CUSTOMER_ID, PASSWORD, TOKEN, default_state, spawn_backend};

fn repo(url: &str) -> HttpRepository {
    HttpRepository::new(url, Duration::from_secs(5))
        .unwrap()
        .authorized(Some(TOKEN))
}

fn credentials(password: &str) -> Credentials {
    Credentials {
        number: NonEmptyString::new("9876543210").unwrap(),
        password: NonEmptyString::new(password).unwrap(),
    }
}

fn customer_id() -> CustomerId {
    CustomerId::new(CUSTOMER_ID).unwrap()
}

#[actix_web::test]
async fn login_returns_token_and_customer() {
    let backend = spawn_backend(default_state()).await;
    let anonymous = HttpRepository::new(&backend.url, Duration::from_secs(5)).unwrap();

    let session = anonymous.login(&credentials(PASSWORD)).await.unwrap();

    assert_eq!(session.token, TOKEN);
    assert_eq!(session.customer.id.as_str(), CUSTOMER_ID);
    assert_eq!(session.customer.credit, 500);
}

#[actix_web::test]
async fn rejected_login_is_auth_error_with_backend_text() {
    let backend = spawn_backend(default_state()).await;
    let anonymous = HttpRepository::new(&backend.url, Duration::from_secs(5)).unwrap();

    let err = anonymous.login(&credentials("wrong")).await.unwrap_err();

    assert_eq!(err, RepositoryError::Auth("Invalid credentials".into()));
}

#[actix_web::test]
async fn missing_token_surfaces_as_auth_error() {
    let backend = spawn_backend(default_state()).await;
    let anonymous = HttpRepository::new(&backend.url, Duration::from_secs(5)).unwrap();

    let err = anonymous.get_customer(&customer_id()).await.unwrap_err();

    assert!(err.is_auth());
}

#[actix_web::test]
async fn filter_query_lists_only_set_predicates_then_page_and_limit() {
    let backend = spawn_backend(default_state()).await;
    let filter = LeadFilter {
        areas: Some("Shela".into()),
        bhk: vec!["2BHK".into()],
        ..LeadFilter::default()
    };

    let page = repo(&backend.url)
        .list_filtered_leads(&LeadListQuery::new(filter).paginate(1, 25))
        .await
        .unwrap();

    assert_eq!(
        backend.filter_queries(),
        vec!["areas=Shela&bhk=2BHK&page=1&limit=25".to_string()]
    );
    assert_eq!(page.leads.len(), 1);
    assert_eq!(page.leads[0].id.as_str(), "l1");
    assert_eq!(page.pages, 1);
    assert_eq!(page.current_page, 1);
}

#[actix_web::test]
async fn pagination_totals_come_from_backend() {
    let backend = spawn_backend(default_state()).await;

    let page = repo(&backend.url)
        .list_filtered_leads(&LeadListQuery::default().paginate(2, 2))
        .await
        .unwrap();

    assert_eq!(page.total, 3);
    assert_eq!(page.pages, 2);
    assert_eq!(page.current_page, 2);
    assert_eq!(page.leads.len(), 1);
}

#[actix_web::test]
async fn purchase_deducts_credit_and_unlocks_contact() {
    let backend = spawn_backend(default_state()).await;
    let repo = repo(&backend.url);
    let lead_id = LeadId::new("l1").unwrap();

    repo.purchase_lead(&customer_id(), &lead_id).await.unwrap();
    let customer = repo.get_customer(&customer_id()).await.unwrap();

    assert_eq!(customer.credit, 400);
    assert!(customer.has_purchased(&lead_id));
    let bought = customer.purchased_leads[0].as_lead().unwrap();
    assert_eq!(bought.contact().unwrap().name, "Owner l1");
}

#[actix_web::test]
async fn purchase_failures_carry_backend_text_and_leave_credit() {
    let backend = spawn_backend(default_state()).await;
    let repo = repo(&backend.url);

    let err = repo
        .purchase_lead(&customer_id(), &LeadId::new("l3").unwrap())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Insufficient credit");

    repo.purchase_lead(&customer_id(), &LeadId::new("l2").unwrap())
        .await
        .unwrap();
    let err = repo
        .purchase_lead(&customer_id(), &LeadId::new("l2").unwrap())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Lead already purchased");

    assert_eq!(backend.customer()["credit"], 350);
}

#[actix_web::test]
async fn toggling_save_twice_restores_state() {
    let backend = spawn_backend(default_state()).await;
    let repo = repo(&backend.url);
    let lead_id = LeadId::new("l2").unwrap();

    repo.toggle_save_lead(&customer_id(), &lead_id).await.unwrap();
    assert!(repo.get_customer(&customer_id()).await.unwrap().has_saved(&lead_id));

    repo.toggle_save_lead(&customer_id(), &lead_id).await.unwrap();
    assert!(!repo.get_customer(&customer_id()).await.unwrap().has_saved(&lead_id));
}

#[actix_web::test]
async fn full_lead_list_reports_total() {
    let backend = spawn_backend(default_state()).await;

    let list = repo(&backend.url).list_all_leads().await.unwrap();

    assert_eq!(list.total, 3);
    assert_eq!(list.leads.len(), 3);
}

#[actix_web::test]
async fn unreachable_backend_is_network_error() {
    let repo = HttpRepository::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();

    let err = repo.list_all_leads().await.unwrap_err();

    assert!(matches!(err, RepositoryError::Network(_)));
}
