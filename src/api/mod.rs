// SPDX-License-Identifier: GPL-3.0-only
pub mod handlers;
pub mod http;

pub use handlers::ApiHandlers;
pub use http::HttpServer;
