use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u32,
    pub name: String,
    pub status: TaskStatus,
}

/// Backing storage for the task list. Only an in-memory store ships; a
/// durable one only needs these two calls.
pub trait TaskStore: Send {
    fn list(&self) -> Vec<Task>;
    fn add(&mut self, name: &str) -> Task;
}

#[derive(Debug)]
pub struct InMemoryTaskStore {
    tasks: Vec<Task>,
    next_id: u32,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
        }
    }

    /// Store pre-populated with the demo tasks shown on first launch
    pub fn with_demo_tasks() -> Self {
        let mut store = Self::new();
        for (name, status) in [
            ("Review project proposal", TaskStatus::InProgress),
            ("Schedule team meeting", TaskStatus::Pending),
            ("Update documentation", TaskStatus::Completed),
            ("Prepare quarterly report", TaskStatus::Pending),
        ] {
            store.insert(name, status);
        }
        store
    }

    fn insert(&mut self, name: &str, status: TaskStatus) -> Task {
        let task = Task {
            id: self.next_id,
            name: name.to_string(),
            status,
        };
        self.next_id += 1;
        self.tasks.push(task.clone());
        task
    }
}

impl TaskStore for InMemoryTaskStore {
    fn list(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    fn add(&mut self, name: &str) -> Task {
        self.insert(name, TaskStatus::Pending)
    }
}
