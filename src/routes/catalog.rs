use crate::models::{BenchmarkQuery, BenchmarksResponse};
use crate::routes::AppState;
use actix_web::{web, HttpResponse};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/benchmarks", web::get().to(list_benchmarks));
}

/// Compensation benchmarks
///
/// GET /api/v1/benchmarks?role=&level=&location=&companyStage=
///
/// Every provided filter must match exactly.
async fn list_benchmarks(
    state: web::Data<AppState>,
    query: web::Query<BenchmarkQuery>,
) -> HttpResponse {
    HttpResponse::Ok().json(BenchmarksResponse {
        benchmarks: state.catalog.filter_benchmarks(&query),
    })
}
