use crate::report_bridge::model::ReportModel;
use crate::workflow::runner::{RaceData, Runner, Selection};
use anyhow::{anyhow, Result};
use log::{error, info};
use serde::Deserialize;
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

type SharedModel = Arc<RwLock<ReportModel>>;

pub fn bridge_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

#[derive(Debug)]
struct BridgeError;

impl warp::reject::Reject for BridgeError {}

/// Body accepted by `POST /analyze`.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(flatten)]
    pub race: RaceData,
    #[serde(default)]
    pub selection: Selection,
}

/// Holds the latest report and optionally serves it over HTTP.
pub struct ReportBridge {
    state: SharedModel,
    runner: Arc<Runner>,
}

impl ReportBridge {
    pub fn new(runner: Arc<Runner>) -> Self {
        Self {
            state: Arc::new(RwLock::new(ReportModel::new())),
            runner,
        }
    }

    /// Starts the HTTP endpoint on its own thread.
    pub fn serve(&self, addr: SocketAddr) -> thread::JoinHandle<()> {
        let state_for_filter = self.state.clone();
        let runner = self.runner.clone();
        let state_filter = warp::any().map(move || state_for_filter.clone());
        let runner_filter = warp::any().map(move || runner.clone());

        let report_route = warp::path("report")
            .and(warp::get())
            .and(state_filter.clone())
            .and_then(|state: SharedModel| async move {
                let model = state
                    .read()
                    .map_err(|_| warp::reject::custom(BridgeError))?
                    .clone();
                Ok::<_, warp::Rejection>(warp::reply::json(&model))
            });

        let analyze_route = warp::path("analyze")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter)
            .and(runner_filter)
            .and_then(
                |request: AnalyzeRequest, state: SharedModel, runner: Arc<Runner>| async move {
                    match runner.execute(&request.race, &request.selection) {
                        Ok(result) => {
                            let model = ReportModel::from_result(&result);
                            if let Ok(mut guard) = state.write() {
                                *guard = model.clone();
                            }
                            info!(
                                "[bridge] race {} -> {} boats",
                                model.race_id,
                                model.boats.len()
                            );
                            Ok::<_, warp::Rejection>(warp::reply::with_status(
                                warp::reply::json(&model),
                                StatusCode::OK,
                            ))
                        }
                        Err(err) => {
                            error!("analyze error: {:#}", err);
                            Err(warp::reject::custom(BridgeError))
                        }
                    }
                },
            );

        thread::spawn(move || {
            let routes = report_route.or(analyze_route);
            match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime.block_on(async move {
                    warp::serve(routes).run(addr).await;
                }),
                Err(err) => error!("failed to build bridge runtime: {}", err),
            }
        })
    }

    pub fn publish(&self, model: &ReportModel) -> Result<()> {
        let mut guard = self
            .state
            .write()
            .map_err(|_| anyhow!("report state lock poisoned"))?;
        *guard = model.clone();
        info!(
            "[bridge] {}: {} boats, {} speed points",
            guard.title,
            guard.boats.len(),
            guard.boats.iter().map(|b| b.points.len()).sum::<usize>()
        );
        Ok(())
    }

    pub fn publish_status(&self, message: &str) {
        info!("[bridge] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> Result<ReportModel> {
        let guard = self
            .state
            .read()
            .map_err(|_| anyhow!("report state lock poisoned"))?;
        Ok(guard.clone())
    }
}
