//! Agent registry: agent-type name → description + constructor.
//!
//! Registration is last-write-wins and meant to happen at startup; lookups are
//! read-only afterwards. [`AgentRegistry::global`] is the process-wide instance,
//! pre-populated with the built-in agents.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::AgentError;
use crate::knowledge::KnowledgeStore;
use crate::llm::LlmClient;
use crate::settings::Settings;
use crate::tools::ToolRegistry;

use super::{Agent, OrchestratorAgent, PlanningAgent, RetrievalAgent};

/// Construction arguments shared by every agent type; each type reads what it needs.
#[derive(Clone)]
pub struct AgentArgs {
    pub thread_id: String,
    pub model: Arc<dyn LlmClient>,
    /// Tools offered to the planner.
    pub tools: ToolRegistry,
    /// Knowledge store of the retriever.
    pub knowledge: Option<Arc<dyn KnowledgeStore>>,
    /// Agents the orchestrator may delegate to.
    pub managed_agents: Vec<Arc<dyn Agent>>,
    pub settings: Settings,
}

impl AgentArgs {
    pub fn new(thread_id: impl Into<String>, model: Arc<dyn LlmClient>) -> Self {
        Self {
            thread_id: thread_id.into(),
            model,
            tools: ToolRegistry::new(),
            knowledge: None,
            managed_agents: Vec::new(),
            settings: Settings::default(),
        }
    }

    pub fn with_tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_knowledge(mut self, knowledge: Arc<dyn KnowledgeStore>) -> Self {
        self.knowledge = Some(knowledge);
        self
    }

    pub fn with_managed_agents(mut self, agents: Vec<Arc<dyn Agent>>) -> Self {
        self.managed_agents = agents;
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }
}

pub type AgentConstructor =
    Arc<dyn Fn(AgentArgs) -> Result<Arc<dyn Agent>, AgentError> + Send + Sync>;

/// Discovery entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentInfo {
    pub name: String,
    pub description: String,
}

#[derive(Clone)]
struct Registration {
    description: String,
    constructor: AgentConstructor,
}

#[derive(Default)]
struct Entries {
    order: Vec<String>,
    by_name: HashMap<String, Registration>,
}

/// Name-keyed agent constructors, in registration order.
#[derive(Default)]
pub struct AgentRegistry {
    entries: RwLock<Entries>,
}

static GLOBAL: Lazy<AgentRegistry> = Lazy::new(|| {
    let registry = AgentRegistry::new();
    register_builtin_agents(&registry);
    registry
});

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry holding the built-in agents.
    pub fn global() -> &'static AgentRegistry {
        &GLOBAL
    }

    /// Stores (or overwrites) the constructor for `name`.
    pub fn register(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
        constructor: AgentConstructor,
    ) {
        let name = name.into();
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let registration = Registration {
            description: description.into(),
            constructor,
        };
        if entries.by_name.insert(name.clone(), registration).is_none() {
            entries.order.push(name.clone());
        }
        tracing::debug!(agent = %name, "agent type registered");
    }

    /// Constructor for `name`; `NotFound` lists the registered names.
    pub fn get_constructor(&self, name: &str) -> Result<AgentConstructor, AgentError> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries
            .by_name
            .get(name)
            .map(|r| r.constructor.clone())
            .ok_or_else(|| AgentError::NotFound {
                kind: "agent",
                name: name.to_string(),
                available: entries.order.clone(),
            })
    }

    pub fn create(&self, name: &str, args: AgentArgs) -> Result<Arc<dyn Agent>, AgentError> {
        let constructor = self.get_constructor(name)?;
        constructor(args)
    }

    pub fn list_agents(&self) -> Vec<AgentInfo> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries
            .order
            .iter()
            .filter_map(|name| {
                entries.by_name.get(name).map(|r| AgentInfo {
                    name: name.clone(),
                    description: r.description.clone(),
                })
            })
            .collect()
    }
}

/// Registers `orchestrator`, `planning` and `retrieval`.
pub fn register_builtin_agents(registry: &AgentRegistry) {
    registry.register(
        OrchestratorAgent::NAME,
        OrchestratorAgent::DESCRIPTION,
        Arc::new(|args: AgentArgs| -> Result<Arc<dyn Agent>, AgentError> {
            Ok(Arc::new(OrchestratorAgent::new(args)?))
        }),
    );
    registry.register(
        PlanningAgent::NAME,
        PlanningAgent::DESCRIPTION,
        Arc::new(|args: AgentArgs| -> Result<Arc<dyn Agent>, AgentError> {
            Ok(Arc::new(PlanningAgent::new(args)?))
        }),
    );
    registry.register(
        RetrievalAgent::NAME,
        RetrievalAgent::DESCRIPTION,
        Arc::new(|args: AgentArgs| -> Result<Arc<dyn Agent>, AgentError> {
            Ok(Arc::new(RetrievalAgent::new(args)?))
        }),
    );
}
