//! Group list pane — every stored group, the selected one expanded to show
//! its people and who has already been picked.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

use crate::core::group::Group;

use super::theme::Theme;

pub struct GroupList<'a> {
    groups: &'a [Group],
    selected: usize,
    block: Option<Block<'a>>,
}

impl<'a> GroupList<'a> {
    pub fn new(groups: &'a [Group], selected: usize) -> Self {
        Self {
            groups,
            selected,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn lines(&self) -> Vec<Line<'a>> {
        if self.groups.is_empty() {
            return vec![
                Line::styled("No groups yet.", Theme::hint_style()),
                Line::styled("Create one with --new-group", Theme::hint_style()),
                Line::styled("or --import <link>.", Theme::hint_style()),
            ];
        }

        let mut lines = Vec::new();
        for (i, group) in self.groups.iter().enumerate() {
            let is_selected = i == self.selected;
            let (prefix, style) = if is_selected {
                ("▸ ", Theme::selected_style())
            } else {
                ("  ", Theme::group_style())
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{prefix}{}", group.name), style),
                Span::styled(
                    format!("  {}/{}", group.selected_count(), group.people.len()),
                    Theme::hint_style(),
                ),
            ]));

            if is_selected {
                for person in &group.people {
                    let style = if person.is_selected {
                        Theme::picked_style()
                    } else {
                        Theme::group_style()
                    };
                    let weight = if person.weight > 1.0 {
                        format!(" ×{}", person.weight)
                    } else {
                        String::new()
                    };
                    lines.push(Line::from(vec![
                        Span::raw("    "),
                        Span::styled(person.name.clone(), style),
                        Span::styled(weight, Theme::hint_style()),
                    ]));
                }
            }
        }
        lines
    }
}

impl Widget for GroupList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = self.lines();
        let mut paragraph = Paragraph::new(lines);
        if let Some(block) = self.block {
            paragraph = paragraph.block(block);
        }
        paragraph.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::group::Person;

    #[test]
    fn selected_group_lists_people() {
        let mut bo = Person::new("bo", 2.0);
        bo.is_selected = true;
        let groups = vec![
            Group {
                id: "1".into(),
                name: "standup".into(),
                respect_early_selection: true,
                people: vec![Person::new("ana", 1.0), bo],
            },
            Group {
                id: "2".into(),
                name: "retro".into(),
                respect_early_selection: false,
                people: vec![Person::new("cy", 1.0)],
            },
        ];
        let lines = GroupList::new(&groups, 0).lines();
        // Two group rows + two people under the selected one.
        assert_eq!(lines.len(), 4);
        let text: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        assert_eq!(text[0], "▸ standup  1/2");
        assert_eq!(text[2], "    bo ×2");
        assert_eq!(text[3], "  retro  0/1");
    }
}
