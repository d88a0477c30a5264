//! Vertical text menu shared by the menu-like screens.

use crate::components::mapposition::Vec2;
use crate::resources::input::{Action, InputSnapshot};
use crate::resources::renderframe::{Color, RenderFrame};

#[derive(Clone, Debug)]
pub struct MenuItem {
    pub id: String,
    pub label: String,
    pub enabled: bool,
}

#[derive(Clone, Debug)]
pub struct Menu {
    pub items: Vec<MenuItem>,
    pub selected_index: usize,
    pub font_size: f32,
    pub item_spacing: f32,
    pub normal_color: Color,
    pub selected_color: Color,
    pub disabled_color: Color,
    pub origin: Vec2,
}

impl Menu {
    pub fn new(labels: &[(&str, &str)], origin: Vec2, font_size: f32, item_spacing: f32) -> Self {
        let items = labels
            .iter()
            .map(|(id, label)| MenuItem {
                id: id.to_string(),
                label: label.to_string(),
                enabled: true,
            })
            .collect();
        Self {
            items,
            selected_index: 0,
            font_size,
            item_spacing,
            normal_color: Color::WHITE,
            selected_color: Color::GOLD,
            disabled_color: Color::rgb(120, 120, 120),
            origin,
        }
    }

    pub fn with_colors(mut self, normal: Color, selected: Color) -> Self {
        self.normal_color = normal;
        self.selected_color = selected;
        self
    }

    pub fn set_enabled(&mut self, id: &str, enabled: bool) {
        if let Some(item) = self.items.iter_mut().find(|i| i.id == id) {
            item.enabled = enabled;
        }
        if !self.is_enabled(self.selected_index) {
            self.step(1);
        }
    }

    pub fn selected(&self) -> Option<&MenuItem> {
        self.items.get(self.selected_index)
    }

    pub fn reset(&mut self) {
        self.selected_index = 0;
        if !self.is_enabled(0) {
            self.step(1);
        }
    }

    fn is_enabled(&self, index: usize) -> bool {
        self.items.get(index).is_some_and(|i| i.enabled)
    }

    /// Move the cursor by `delta`, skipping disabled items and wrapping.
    fn step(&mut self, delta: isize) {
        let len = self.items.len() as isize;
        if len == 0 {
            return;
        }
        let mut index = self.selected_index as isize;
        for _ in 0..len {
            index = (index + delta).rem_euclid(len);
            if self.is_enabled(index as usize) {
                self.selected_index = index as usize;
                return;
            }
        }
    }

    /// Handle navigation. Returns the id of the item confirmed this tick.
    pub fn handle_input(&mut self, input: &InputSnapshot) -> Option<String> {
        if input.just_pressed(Action::Up) {
            self.step(-1);
        }
        if input.just_pressed(Action::Down) {
            self.step(1);
        }
        let confirm = input.just_pressed(Action::Confirm) || input.just_pressed(Action::UseTool);
        if confirm && self.is_enabled(self.selected_index) {
            return self.selected().map(|i| i.id.clone());
        }
        None
    }

    pub fn render(&self, frame: &mut RenderFrame) {
        for (i, item) in self.items.iter().enumerate() {
            let color = if !item.enabled {
                self.disabled_color
            } else if i == self.selected_index {
                self.selected_color
            } else {
                self.normal_color
            };
            let y = self.origin.y + i as f32 * self.item_spacing;
            let label = if i == self.selected_index {
                format!("> {}", item.label)
            } else {
                format!("  {}", item.label)
            };
            frame.text(label, self.origin.x, y, self.font_size, color);
        }
    }
}
