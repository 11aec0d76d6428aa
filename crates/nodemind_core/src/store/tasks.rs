use super::observer::{ChangeSet, Slice};
use super::Store;
use crate::model::task::{NewTask, Task, TaskId, TaskPatch};
use log::debug;

impl Store {
    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.state.tasks.iter().find(|task| task.id == id)
    }

    /// Appends a new incomplete task and returns its id.
    pub fn add_task(&mut self, input: NewTask) -> TaskId {
        let task = Task::create(input, self.clock.now_ms(), self.clock.today());
        let id = task.id;
        self.state.tasks.push(task);
        debug!("event=task_add module=store status=ok task_id={id}");
        self.commit(ChangeSet::of(Slice::Tasks));
        id
    }

    pub fn update_task(&mut self, id: TaskId, patch: TaskPatch) {
        let Some(task) = self.state.tasks.iter_mut().find(|task| task.id == id) else {
            debug!("event=task_update module=store status=noop reason=not_found task_id={id}");
            return;
        };
        task.apply(patch);
        debug!("event=task_update module=store status=ok task_id={id}");
        self.commit(ChangeSet::of(Slice::Tasks));
    }

    /// Flips completion of one task.
    ///
    /// Completing the task the running focus timer is attached to stops the
    /// timer first; both changes land in the same snapshot.
    pub fn toggle_task(&mut self, id: TaskId) {
        let now_ms = self.clock.now_ms();
        let Some(index) = self.state.tasks.iter().position(|task| task.id == id) else {
            debug!("event=task_toggle module=store status=noop reason=not_found task_id={id}");
            return;
        };

        let mut changes = ChangeSet::of(Slice::Tasks);
        let completing = !self.state.tasks[index].is_completed;
        let focus = &self.state.active_focus;
        if completing && focus.is_active && focus.task_id == Some(id) {
            self.reset_focus();
            changes.insert(Slice::ActiveFocus);
            debug!("event=focus_stop module=store status=ok reason=task_completed task_id={id}");
        }

        self.state.tasks[index].toggle(now_ms);
        debug!("event=task_toggle module=store status=ok task_id={id} completed={completing}");
        self.commit(changes);
    }

    /// Removes one task. Sessions referencing it are kept.
    pub fn delete_task(&mut self, id: TaskId) {
        let before = self.state.tasks.len();
        self.state.tasks.retain(|task| task.id != id);
        if self.state.tasks.len() == before {
            debug!("event=task_delete module=store status=noop reason=not_found task_id={id}");
            return;
        }
        debug!("event=task_delete module=store status=ok task_id={id}");
        self.commit(ChangeSet::of(Slice::Tasks));
    }
}
