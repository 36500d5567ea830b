//! Command handlers.
//!
//! [`Cli`] owns the registry for the session, runs one command against it and
//! renders the result. Core errors are turned into user-facing messages here,
//! with the original error kept as the cause.

use std::{sync::Arc, time::Duration};

use anyhow::{bail, Context, Result};
use log::{debug, info, warn};
use waymark_core::{
    params::TagLocation, Coordinates, FixedPosition, LocationId, LocationRegistry,
    NavigationPlanner, PositionFile, PositionSource, PositionTracker, WaymarkError,
};

use crate::{
    args::{ClearArgs, Commands, IdArgs, NavigateArgs, TagArgs},
    display::{
        ClearResult, CreateResult, DeleteResult, ErrorMessage, LocationDetails, LocationList,
        RouteSummary, StatusReport,
    },
    renderer::TerminalRenderer,
};

/// Attaches the user-facing message for a core error.
fn user_error(err: WaymarkError) -> anyhow::Error {
    let message = ErrorMessage(&err).to_string();
    anyhow::Error::new(err).context(message)
}

pub struct Cli {
    registry: LocationRegistry,
    renderer: TerminalRenderer,
    remote_configured: bool,
}

impl Cli {
    pub fn new(
        registry: LocationRegistry,
        renderer: TerminalRenderer,
        remote_configured: bool,
    ) -> Self {
        Self {
            registry,
            renderer,
            remote_configured,
        }
    }

    /// Runs `command`, defaulting to `list`.
    pub async fn run(self, command: Option<Commands>) -> Result<()> {
        match command {
            Some(Commands::Tag(args)) => self.tag(args).await,
            Some(Commands::List) | None => self.list().await,
            Some(Commands::Show(args)) => self.show(args).await,
            Some(Commands::Remove(args)) => self.remove(args).await,
            Some(Commands::Clear(args)) => self.clear(args).await,
            Some(Commands::Navigate(args)) => self.navigate(args).await,
            Some(Commands::Status) => self.status().await,
        }
    }

    async fn tag(&self, args: TagArgs) -> Result<()> {
        let params = TagLocation::from(args);
        let location = self.registry.add(&params).await.map_err(user_error)?;
        self.renderer.render(&CreateResult(&location).to_string());
        Ok(())
    }

    async fn list(&self) -> Result<()> {
        let locations = self.registry.list().await.map_err(user_error)?;
        self.renderer.render(&LocationList(&locations).to_string());
        Ok(())
    }

    async fn show(&self, args: IdArgs) -> Result<()> {
        let id = LocationId::from(args);
        let location = self.registry.find_by_id(&id).await.map_err(user_error)?;
        self.renderer.render(&LocationDetails(&location).to_string());
        Ok(())
    }

    async fn remove(&self, args: IdArgs) -> Result<()> {
        let id = LocationId::from(args);
        let removed = self.registry.remove(&id).await.map_err(user_error)?;

        let output = match &removed {
            Some(location) => DeleteResult::Removed(location),
            None => DeleteResult::Absent(id.as_str()),
        };
        self.renderer.render(&output.to_string());
        Ok(())
    }

    async fn clear(&self, args: ClearArgs) -> Result<()> {
        if !args.yes {
            let count = self.registry.list().await.map_err(user_error)?.len();
            bail!("Refusing to remove {count} tagged location(s) without --yes");
        }

        let cleared = self.registry.clear().await.map_err(user_error)?;
        self.renderer.render(&ClearResult(cleared).to_string());
        Ok(())
    }

    async fn status(&self) -> Result<()> {
        let backend = self.registry.active_backend().await;
        let count = self.registry.list().await.map_err(user_error)?.len();

        let report = StatusReport {
            backend,
            remote_configured: self.remote_configured,
            degraded: self.registry.is_degraded().await,
            count,
        };
        self.renderer.render(&report.to_string());
        Ok(())
    }

    async fn navigate(&self, args: NavigateArgs) -> Result<()> {
        let target = LocationId::from(args.id);
        let source: Arc<dyn PositionSource> = match (args.from, args.position_file) {
            (Some(from), _) => Arc::new(FixedPosition::new(from)),
            (None, Some(path)) => Arc::new(PositionFile::new(path)),
            (None, None) => bail!("Either --from or --position-file is required"),
        };

        if args.follow {
            return self
                .follow(source, &target, Duration::from_secs(args.interval))
                .await;
        }

        let current = match source.current_position() {
            Ok(position) => Some(position),
            Err(e) => {
                warn!("{e}");
                None
            }
        };
        self.render_route(current, &target).await
    }

    async fn render_route(&self, current: Option<Coordinates>, target: &LocationId) -> Result<()> {
        let route = NavigationPlanner::new(&self.registry)
            .plan_route(current, target)
            .await
            .map_err(user_error)?;
        self.renderer.render(&RouteSummary(&route).to_string());
        Ok(())
    }

    /// Re-plans the route on every new position sample until Ctrl-C.
    async fn follow(
        &self,
        source: Arc<dyn PositionSource>,
        target: &LocationId,
        interval: Duration,
    ) -> Result<()> {
        // Fail fast on a target that does not exist.
        self.registry.find_by_id(target).await.map_err(|e| match e {
            WaymarkError::NotFound { id } => user_error(WaymarkError::TargetNotFound { id }),
            other => user_error(other),
        })?;

        let tracker = PositionTracker::spawn(source, interval);
        let mut updates = tracker.subscribe();
        info!("Following position every {}s", interval.as_secs());

        // One listener for the whole session so a Ctrl-C during a slow
        // route lookup is still seen on the next turn of the loop.
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        let result = loop {
            tokio::select! {
                signal = &mut ctrl_c => {
                    if let Err(e) = signal {
                        warn!("Failed to listen for Ctrl-C: {e}");
                    }
                    debug!("Follow mode interrupted");
                    break Ok(());
                }
                changed = updates.changed() => {
                    if changed.is_err() {
                        break Ok(());
                    }
                    let current = *updates.borrow_and_update();

                    // Another session may have removed the target meanwhile.
                    self.registry.invalidate().await;
                    match self.render_route(current, target).await {
                        Ok(()) => println!(),
                        Err(e) => break Err(e),
                    }
                }
            }
        };

        tracker.shutdown().await;
        result.context("Navigation stopped")
    }
}
