//! Countdown таймеры для combat
//!
//! Всё, что в движке было бы "подождать N секунд, потом X", здесь:
//! запись `{ remaining, action }`, которую двигает `tick(dt)` владельца.
//! Никаких корутин: порядок и one-shot семантика детерминированы.

use bevy::prelude::*;

/// Cooldown gate (атака игрока, атака босса, интервал ловушки)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Cooldown {
    pub duration: f32,
    pub remaining: f32,
}

impl Cooldown {
    /// Новый cooldown, сразу готов (первая атака не ждёт)
    pub fn ready(duration: f32) -> Self {
        Self {
            duration: duration.max(0.0),
            remaining: 0.0,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Запустить заново с полной длительностью
    pub fn trigger(&mut self) {
        self.remaining = self.duration;
    }

    pub fn tick(&mut self, delta: f32) {
        if self.remaining > 0.0 {
            self.remaining -= delta;
            if self.remaining <= 0.0 {
                self.remaining = 0.0;
            }
        }
    }

    pub fn reset(&mut self) {
        self.remaining = 0.0;
    }
}

/// Отложенное действие
#[derive(Debug, Clone, PartialEq)]
pub struct Scheduled<A> {
    pub remaining: f32,
    pub action: A,
}

/// Очередь отложенных действий одного владельца
///
/// `tick` возвращает истёкшие действия в порядке истечения; при равном
/// времени: в порядке постановки.
///
/// Reflect не выводится: в компонентах поле помечается `#[reflect(ignore)]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledActions<A> {
    entries: Vec<Scheduled<A>>,
}

impl<A> Default for ScheduledActions<A> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<A> ScheduledActions<A> {
    pub fn schedule(&mut self, delay: f32, action: A) {
        let remaining = if delay.is_finite() { delay.max(0.0) } else { 0.0 };
        self.entries.push(Scheduled { remaining, action });
    }

    pub fn tick(&mut self, delta: f32) -> Vec<A> {
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };

        for entry in self.entries.iter_mut() {
            entry.remaining -= delta;
        }

        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|entry| entry.remaining <= 0.0);
        self.entries = pending;

        // Stable sort: раньше истёк (более отрицательный remaining), раньше выполняется
        due.sort_by(|a, b| a.remaining.total_cmp(&b.remaining));
        due.into_iter().map(|entry| entry.action).collect()
    }

    /// Отменить всё (respawn / reset / смерть)
    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, predicate: impl Fn(&A) -> bool) -> bool {
        self.entries.iter().any(|entry| predicate(&entry.action))
    }
}
