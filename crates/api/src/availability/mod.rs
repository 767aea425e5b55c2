mod get_availability;

use actix_web::web;
pub(crate) use get_availability::busy_intervals_for_day;
use get_availability::get_availability_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/availability/{service_id}/slots",
        web::get().to(get_availability_controller),
    );
}
