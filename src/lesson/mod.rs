pub mod engine;
pub mod input;
pub mod mistakes;
pub mod plan;
pub mod timer;
pub mod validator;

pub use engine::{LessonCompletion, LessonEngine, SessionStats, Status, Step};
pub use mistakes::{MistakeManager, MistakeRecord};
pub use plan::{LessonPlan, LessonScreen, PlanError, Widget, WidgetKind};
