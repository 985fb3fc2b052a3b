use super::{Task, TaskOutput};
use crate::{Context, Graph, GraphError, Node, NodeError, NodeOutput, NodeResult};
use async_trait::async_trait;
use routegraph_macros::State;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CrewError {
    #[error("Crew has no tasks")]
    Empty,

    #[error("Task {task} reads context from task {context}, which does not run before it")]
    InvalidContext { task: usize, context: usize },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

pub type CrewResult<T> = Result<T, CrewError>;

/// Outputs collected so far, in task order.
#[derive(State, Debug, Clone, Default, PartialEq)]
pub struct CrewState {
    #[update(append)]
    pub outputs: Vec<TaskOutput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewOutput {
    pub tasks_output: Vec<TaskOutput>,
    /// Output of the final task
    pub raw: String,
}

/// Tasks run in order, each by its own agent.
#[derive(Debug, Clone)]
pub struct Crew {
    name: String,
    tasks: Vec<Task>,
}

impl Crew {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            name: "crew".to_string(),
            tasks,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    fn validate(&self) -> CrewResult<()> {
        if self.tasks.is_empty() {
            return Err(CrewError::Empty);
        }
        for (task, t) in self.tasks.iter().enumerate() {
            if let Some(&context) = t.context_indices(task).iter().find(|&&c| c >= task) {
                return Err(CrewError::InvalidContext { task, context });
            }
        }
        Ok(())
    }

    pub async fn kickoff(&self, ctx: &Context) -> CrewResult<CrewOutput> {
        self.validate()?;

        let names: Vec<String> = (0..self.tasks.len()).map(task_node_name).collect();
        let mut graph = Graph::new(self.name.clone());
        for (index, task) in self.tasks.iter().enumerate() {
            graph.add_node(TaskNode {
                name: names[index].clone(),
                index,
                task: task.clone(),
            });
        }
        graph.set_entry_point(names[0].clone());
        for pair in names.windows(2) {
            graph.add_edge(pair[0].clone(), pair[1].clone());
        }
        graph.set_finish_point(names[names.len() - 1].clone());
        // One step per task
        graph.with_recursion_limit(self.tasks.len());

        info!(crew = %self.name, tasks = self.tasks.len(), "crew kickoff");
        let state = graph.build()?.run(ctx, CrewState::default()).await?;
        info!(crew = %self.name, "crew finished");

        let raw = state
            .outputs
            .last()
            .map(|output| output.raw.clone())
            .unwrap_or_default();
        Ok(CrewOutput {
            tasks_output: state.outputs,
            raw,
        })
    }
}

fn task_node_name(index: usize) -> String {
    format!("task_{}", index)
}

#[derive(Debug)]
struct TaskNode {
    name: String,
    index: usize,
    task: Task,
}

#[async_trait]
impl Node<CrewState> for TaskNode {
    async fn process(&self, ctx: &Context, state: CrewState) -> NodeResult<CrewState> {
        let context = self
            .task
            .context_indices(self.index)
            .into_iter()
            .map(|i| {
                state.outputs.get(i).map(|o| o.raw.as_str()).ok_or_else(|| {
                    NodeError::Execution(format!("no output yet for task {}", i))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let agent = &self.task.agent;
        info!(task = self.index, agent = %agent.role, "agent working on task");
        let raw = agent.respond(ctx, self.task.prompt(&context)).await?;
        info!(task = self.index, agent = %agent.role, chars = raw.len(), "task complete");

        Ok(NodeOutput::Updates(vec![CrewStateUpdate::Outputs(vec![
            TaskOutput {
                description: self.task.description.clone(),
                agent: agent.role.clone(),
                raw,
            },
        ])]))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
