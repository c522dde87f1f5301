// SPDX-FileCopyrightText: 2026 Dripbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rendering of the channel-agnostic keyboard model to Telegram markup.

use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup, ReplyMarkup,
};

use dripbot_core::{Keyboard, Selection};

/// Renders a keyboard to the Telegram reply-markup type.
pub fn render(keyboard: &Keyboard) -> ReplyMarkup {
    match keyboard {
        Keyboard::Menu(rows) => {
            let buttons = rows.iter().map(|row| {
                row.iter()
                    .map(|action| KeyboardButton::new(action.label()))
                    .collect::<Vec<_>>()
            });
            let mut markup = KeyboardMarkup::new(buttons);
            markup.resize_keyboard = true;
            ReplyMarkup::Keyboard(markup)
        }
        Keyboard::Inline(rows) => ReplyMarkup::InlineKeyboard(render_inline(rows)),
    }
}

/// Renders inline rows only; used by message edits, which Telegram
/// restricts to inline markup.
pub fn render_inline(rows: &[Vec<(String, Selection)>]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(rows.iter().map(|row| {
        row.iter()
            .map(|(label, selection)| {
                InlineKeyboardButton::callback(label.clone(), selection.as_payload())
            })
            .collect::<Vec<_>>()
    }))
}
