mod create_booking;

use actix_web::web;
use create_booking::create_booking_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/booking", web::post().to(create_booking_controller));
}
