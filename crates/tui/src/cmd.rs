//! # Command Execution Layer
//!
//! Translates [`Effect`]s into backend work. Components only describe what
//! should happen; this module asks the controller for the matching [`Task`]
//! and hands it back to the runtime, which spawns it and feeds the outcome
//! into [`App::apply_outcome`].
//!
//! Navigation effects (`ShowModal`, `CloseModal`) are handled by the runtime
//! before this module sees the batch.

use formwork_engine::Task;
use tracing::debug;

use crate::app::{App, Effect, Focus};

/// Run non-navigation effects and collect the tasks they started.
pub fn run_from_effects(app: &mut App, effects: Vec<Effect>) -> Vec<Task> {
    let mut tasks = Vec::new();
    for effect in effects {
        match effect {
            Effect::LoadObject(object_id) => {
                debug!(object = %object_id, "switching object");
                app.cursor = 0;
                app.focus = Focus::List;
                tasks.push(app.controller.enter(object_id));
            }
            Effect::Refresh => tasks.extend(app.controller.refresh()),
            Effect::SetStage(stage) => {
                debug!(%stage, "switching layout stage");
                tasks.extend(app.controller.set_stage(stage));
            }
            Effect::SubmitForm => tasks.extend(app.controller.submit_form()),
            Effect::ConfirmDelete => tasks.extend(app.controller.confirm_delete()),
            Effect::Quit => app.should_quit = true,
            Effect::ShowModal(_) | Effect::CloseModal => {}
        }
    }
    app.collect_notifications();
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::loaded_app;
    use formwork_engine::ViewStatus;
    use formwork_types::{LayoutStage, RecordId};

    #[tokio::test]
    async fn refresh_and_stage_switch_produce_tasks() {
        let mut app = loaded_app().await;
        let tasks = run_from_effects(&mut app, vec![Effect::Refresh, Effect::SetStage(LayoutStage::Draft)]);
        assert_eq!(tasks.len(), 2);
        assert_eq!(app.controller.stage(), LayoutStage::Draft);
    }

    #[tokio::test]
    async fn submit_without_form_is_a_no_op() {
        let mut app = loaded_app().await;
        assert!(run_from_effects(&mut app, vec![Effect::SubmitForm, Effect::ConfirmDelete]).is_empty());
    }

    #[tokio::test]
    async fn confirmed_delete_runs_through_the_controller() {
        let mut app = loaded_app().await;
        assert!(app.controller.request_delete(&RecordId::new("c2")));
        let tasks = run_from_effects(&mut app, vec![Effect::ConfirmDelete]);
        assert_eq!(tasks.len(), 1);
        for task in tasks {
            let outcome = task.await;
            for follow_up in app.apply_outcome(outcome) {
                let outcome = follow_up.await;
                app.apply_outcome(outcome);
            }
        }
        assert!(app.controller.record(&RecordId::new("c2")).is_none());
        assert_eq!(app.controller.status(), &ViewStatus::Ready);
        assert!(app.toasts.iter().any(|toast| toast.notification.message == "Record deleted"));
    }

    #[tokio::test]
    async fn quit_sets_the_flag() {
        let mut app = loaded_app().await;
        run_from_effects(&mut app, vec![Effect::Quit]);
        assert!(app.should_quit);
    }
}
