pub mod config;
pub mod intent;
pub mod notifier;
pub mod pipeline;
pub mod response;
pub mod scheduler;
pub mod state;
pub mod tasks;
pub mod view;
pub mod voice;

// Re-export main types for convenience
pub use config::{Config, DelayRange, SettingsDefaults};
pub use intent::{classify, Intent};
pub use notifier::{StatusIcon, StatusNotification};
pub use pipeline::Assistant;
pub use response::{synthesize, synthesize_with};
pub use scheduler::{sleep_until, Continuation, Scheduler, TimerHandle};
pub use state::{Message, Speaker, Transcript};
pub use tasks::{InMemoryTaskStore, Task, TaskStatus, TaskStore};
pub use view::{Rendered, SettingControl, SettingValue, ViewState};
pub use voice::{SimulatedCapture, VoiceCapture, VoiceState};
