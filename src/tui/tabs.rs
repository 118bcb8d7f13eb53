//! Task tabs: the ordered task list and which one is selected.

use crate::models::Task;

/// Selection change the state machine needs to resync with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub task_id: Option<i64>,
}

/// Ordered tasks plus the active index (`None` when the list is empty).
#[derive(Debug, Clone, Default)]
pub struct Tabs {
    tasks: Vec<Task>,
    active: Option<usize>,
}

impl Tabs {
    /// Seed from the store; the first task starts selected.
    pub fn new(tasks: Vec<Task>) -> Self {
        let active = if tasks.is_empty() { None } else { Some(0) };
        Self { tasks, active }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_task(&self) -> Option<&Task> {
        self.active.and_then(|i| self.tasks.get(i))
    }

    fn selection(&self) -> Selection {
        Selection {
            task_id: self.active_task().map(|t| t.id),
        }
    }

    pub fn switch_right(&mut self) -> Option<Selection> {
        let len = self.tasks.len();
        let active = self.active?;
        if len == 0 {
            return None;
        }
        self.active = Some((active + 1) % len);
        Some(self.selection())
    }

    pub fn switch_left(&mut self) -> Option<Selection> {
        let len = self.tasks.len();
        let active = self.active?;
        if len == 0 {
            return None;
        }
        self.active = Some((active + len - 1) % len);
        Some(self.selection())
    }

    /// Add a task at the end and select it.
    pub fn append(&mut self, task: Task) -> Selection {
        self.tasks.push(task);
        self.active = Some(self.tasks.len() - 1);
        self.selection()
    }

    /// Remove the selected task. Selection stays at the same position, or
    /// moves to the new last entry when the removed one was last.
    pub fn remove_active(&mut self) -> Option<(Task, Selection)> {
        let index = self.active?;
        if index >= self.tasks.len() {
            return None;
        }
        let removed = self.tasks.remove(index);
        self.active = match self.tasks.len() {
            0 => None,
            len => Some(index.min(len - 1)),
        };
        Some((removed, self.selection()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task(id: i64) -> Task {
        Task {
            id,
            name: format!("task-{}", id),
            color: "blue".to_string(),
            daily_target_minutes: 60,
            created_at: Utc::now(),
        }
    }

    fn tabs(n: i64) -> Tabs {
        Tabs::new((1..=n).map(task).collect())
    }

    #[test]
    fn test_new_selects_first_or_nothing() {
        assert_eq!(tabs(3).active_index(), Some(0));
        assert_eq!(tabs(0).active_index(), None);
    }

    #[test]
    fn test_switch_right_wraps() {
        let mut t = tabs(3);
        assert_eq!(t.switch_right().unwrap().task_id, Some(2));
        t.switch_right();
        assert_eq!(t.switch_right().unwrap().task_id, Some(1));
        assert_eq!(t.active_index(), Some(0));
    }

    #[test]
    fn test_switch_left_wraps() {
        let mut t = tabs(3);
        assert_eq!(t.switch_left().unwrap().task_id, Some(3));
        assert_eq!(t.active_index(), Some(2));
    }

    #[test]
    fn test_n_switches_right_return_to_start() {
        for n in 1..=5 {
            let mut t = tabs(n);
            t.switch_right();
            let start = t.active_index();
            for _ in 0..n {
                t.switch_right();
            }
            assert_eq!(t.active_index(), start);
        }
    }

    #[test]
    fn test_switch_on_empty_keeps_sentinel() {
        let mut t = tabs(0);
        assert!(t.switch_left().is_none());
        assert!(t.switch_right().is_none());
        assert_eq!(t.active_index(), None);
    }

    #[test]
    fn test_append_selects_new_task() {
        let mut t = tabs(0);
        assert_eq!(t.append(task(9)).task_id, Some(9));
        assert_eq!(t.active_index(), Some(0));

        t.append(task(10));
        assert_eq!(t.active_index(), Some(1));
    }

    #[test]
    fn test_remove_middle_keeps_position() {
        let mut t = tabs(3);
        t.switch_right();
        let (removed, selection) = t.remove_active().unwrap();
        assert_eq!(removed.id, 2);
        assert_eq!(selection.task_id, Some(3));
        assert_eq!(t.active_index(), Some(1));
    }

    #[test]
    fn test_remove_last_moves_to_previous() {
        let mut t = tabs(3);
        t.switch_left();
        let (removed, selection) = t.remove_active().unwrap();
        assert_eq!(removed.id, 3);
        assert_eq!(selection.task_id, Some(2));
    }

    #[test]
    fn test_remove_only_task_sets_sentinel() {
        let mut t = tabs(1);
        let (_, selection) = t.remove_active().unwrap();
        assert_eq!(selection.task_id, None);
        assert_eq!(t.active_index(), None);
        assert!(t.remove_active().is_none());
    }
}
