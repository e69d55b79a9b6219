use anyhow::{anyhow, Context};
use std::str::FromStr;
use types::{AllocatorKind, GenerateParams};

const PREFIX: &str = "TIMETABLE__";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub body_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            body_limit: 2 * 1024 * 1024,
        }
    }
}

/// Defaults for generation requests that leave fields out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolverConfig {
    pub seed: u64,
    pub allocator: AllocatorKind,
    pub timeout_secs: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        let params = GenerateParams::default();
        Self {
            seed: params.seed,
            allocator: params.allocator,
            timeout_secs: 30,
        }
    }
}

impl SolverConfig {
    pub fn params(&self) -> GenerateParams {
        GenerateParams {
            allocator: self.allocator,
            seed: self.seed,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApiConfig {
    pub server: ServerConfig,
    pub solver: SolverConfig,
}

fn parse<T>(key: &str, raw: Option<String>, into: &mut T) -> anyhow::Result<()>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    if let Some(raw) = raw {
        *into = raw
            .trim()
            .parse()
            .with_context(|| format!("{PREFIX}{key}={raw:?}"))?;
    }
    Ok(())
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(format!("{PREFIX}{key}")).ok())
    }

    /// `lookup` receives keys without the `TIMETABLE__` prefix, e.g.
    /// `SERVER__PORT`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut cfg = Self::default();
        if let Some(host) = lookup("SERVER__HOST") {
            cfg.server.host = host;
        }
        parse("SERVER__PORT", lookup("SERVER__PORT"), &mut cfg.server.port)?;
        parse("SERVER__BODY_LIMIT", lookup("SERVER__BODY_LIMIT"), &mut cfg.server.body_limit)?;
        parse("SOLVER__SEED", lookup("SOLVER__SEED"), &mut cfg.solver.seed)?;
        parse("SOLVER__TIMEOUT_SECS", lookup("SOLVER__TIMEOUT_SECS"), &mut cfg.solver.timeout_secs)?;
        if let Some(raw) = lookup("SOLVER__ALLOCATOR") {
            cfg.solver.allocator = match raw.trim().to_ascii_lowercase().as_str() {
                "greedy" => AllocatorKind::Greedy,
                "milp" => AllocatorKind::Milp,
                other => return Err(anyhow!("{PREFIX}SOLVER__ALLOCATOR: unknown allocator {other:?}")),
            };
        }
        Ok(cfg)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
