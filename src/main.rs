// This file is part of the product Squares.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::middleware::Logger;
use actix_web::rt::System;
use actix_web::{web, App, HttpServer};
use log::{info, LevelFilter};
use std::path::PathBuf;
use std::sync::Arc;

mod api;
mod app_state;
mod bootstrap;
mod config;
mod iam;
mod notifications;
mod pages;
mod permissions;
mod realtime;
mod roles;
mod util;

use app_state::AppState;

fn main() {
    let exit_code = run();
    std::process::exit(exit_code);
}

fn run() -> i32 {
    let runtime_root = match parse_args() {
        Ok(root) => root,
        Err(error) => {
            eprintln!("❌ Invalid command line arguments: {}", error);
            eprintln!("❌ Use -C <root> to set the runtime directory.");
            return 1;
        }
    };

    if let Err(error) = pages::validate_registry() {
        eprintln!("❌ {}", error);
        return 1;
    }

    let bootstrap = match bootstrap::bootstrap_runtime(&runtime_root) {
        Ok(result) => result,
        Err(error) => {
            eprintln!("❌ Bootstrap error: {}", error);
            eprintln!("❌ Application cannot start with invalid configuration.");
            return 1;
        }
    };

    init_logging(&bootstrap.config.logging.level);
    if bootstrap.created_config || bootstrap.created_users {
        info!(
            "First run: created defaults in {}",
            runtime_root.display()
        );
    }

    let result = System::new().block_on(run_server(bootstrap));
    match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("❌ Server failed to start: {}", error);
            1
        }
    }
}

fn parse_args() -> Result<PathBuf, String> {
    let mut args = std::env::args().skip(1);
    let mut root = PathBuf::from(".");
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-C" => {
                root = PathBuf::from(
                    args.next()
                        .ok_or_else(|| "-C requires a directory".to_string())?,
                );
            }
            other => return Err(format!("Unknown argument '{}'", other)),
        }
    }
    Ok(root)
}

fn init_logging(level: &str) {
    let log_level = match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .parse_default_env()
        .init();
}

async fn run_server(bootstrap: bootstrap::BootstrapResult) -> std::io::Result<()> {
    let config = Arc::new(bootstrap.config);
    let user_store = Arc::new(bootstrap.user_store);
    let state = web::Data::new(AppState::new(config.clone(), user_store));

    let bind_address = (config.server.host.clone(), config.server.port);
    info!(
        "{} listening on {}:{} ({} workers)",
        config.app.name, config.server.host, config.server.port, config.server.workers
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(api::configure)
    })
    .workers(config.server.workers)
    .bind(bind_address)?
    .run()
    .await
}
