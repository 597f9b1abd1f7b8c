// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Live collaborators for sync runs started from the command line.

use std::path::Path;

use ordersync_core::{Database, SyncType, SystemClock};

use crate::config::{load_dotenv, Config, Credentials};
use crate::error::Result;
use crate::interrupt::Interrupt;
use crate::remote::{ReqwestTransport, RetryPolicy, ShopEndpoint, ThreadSleeper};
use crate::sync::{run_sync, RunContext, RunOutcome, RunSettings};

/// Everything a run needs besides the database, resolved once per process.
pub struct Runtime {
    transport: ReqwestTransport,
    sleeper: ThreadSleeper,
    clock: SystemClock,
    interrupt: Interrupt,
    endpoint: ShopEndpoint,
    credentials: Credentials,
    policy: RetryPolicy,
    settings: RunSettings,
}

impl Runtime {
    /// Resolve shop, credentials and HTTP client.
    ///
    /// Reads `.env` from the project root first, so its variables can supply
    /// both credentials and the shop URL.
    pub fn prepare(work_dir: &Path, config: &Config, interrupt: Interrupt) -> Result<Self> {
        load_dotenv(work_dir)?;
        let endpoint = ShopEndpoint::from_config(config)?;
        let credentials = Credentials::from_env()?;
        let transport = ReqwestTransport::new(config.sync.request_timeout)?;
        tracing::debug!(shop = %endpoint.base(), client_id = %credentials.client_id, "runtime ready");

        Ok(Runtime {
            transport,
            sleeper: ThreadSleeper::new(interrupt.clone()),
            clock: SystemClock,
            interrupt,
            endpoint,
            credentials,
            policy: RetryPolicy::from_config(&config.retry),
            settings: RunSettings::from_config(config),
        })
    }

    pub fn run(&self, db: &Database, sync_type: SyncType) -> Result<RunOutcome> {
        let ctx = RunContext {
            db,
            transport: &self.transport,
            sleeper: &self.sleeper,
            clock: &self.clock,
            interrupt: &self.interrupt,
            endpoint: &self.endpoint,
            credentials: &self.credentials,
            policy: &self.policy,
            settings: &self.settings,
        };
        run_sync(&ctx, sync_type)
    }

    pub fn sleeper(&self) -> &ThreadSleeper {
        &self.sleeper
    }

    pub fn interrupt(&self) -> &Interrupt {
        &self.interrupt
    }
}
