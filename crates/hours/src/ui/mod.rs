pub mod components;
pub mod pages;
pub mod util;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use time::OffsetDateTime;

use crate::app::Model;
use crate::app::model::View;

/// A trait for UI pages that enforces a standard rendering interface.
pub trait Page {
    fn render(&mut self, f: &mut Frame, area: Rect);
}

/// A trait for UI components that enforces a standard rendering interface.
pub trait Component {
    fn render(&self, f: &mut Frame, area: Rect);
}

/// Draws the whole screen for the current view.
pub fn render(f: &mut Frame, model: &Model, now: OffsetDateTime) {
    let area = f.area();

    if model.view == View::InsufficientSize {
        pages::insufficient_size::InsufficientSizePage::new(area.width, area.height)
            .render(f, area);

        return;
    }

    let outer_chunks = Layout::default()
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let status_bar_area = outer_chunks[0];
    let content_area = outer_chunks[1];
    let footer_bar_area = outer_chunks[2];

    components::status_bar::StatusBar::new(model, now).render(f, status_bar_area);
    components::footer_bar::FooterBar::new(model).render(f, footer_bar_area);

    if model.view == View::Help {
        render_view(f, content_area, model, model.last_view);
        components::help_overlay::HelpOverlay::new(model.last_view, model.help_scroll)
            .render(f, content_area);

        return;
    }

    render_view(f, content_area, model, model.view);
}

fn render_view(f: &mut Frame, area: Rect, model: &Model, view: View) {
    let tracked_task_id = model.tracking.task_id();

    match view {
        View::TaskList => {
            pages::item_list::ItemListPage::new(view.title(), &model.tasks)
                .with_tracked(tracked_task_id)
                .render(f, area);
        }
        View::TaskLogList => {
            pages::item_list::ItemListPage::new(view.title(), &model.log_entries).render(f, area);
        }
        View::InactiveTaskList => {
            pages::item_list::ItemListPage::new(view.title(), &model.inactive_tasks)
                .render(f, area);
        }
        View::MoveTargetPicker => {
            pages::item_list::ItemListPage::new(view.title(), &model.move_targets).render(f, area);
        }
        View::TaskLogDetails => {
            pages::log_details::LogDetailsPage::new(model.log_entries.selected()).render(f, area);
        }
        View::TaskForm => {
            pages::task_form::TaskFormPage::new(&model.task_form).render(f, area);
        }
        View::EditOpenEntryForm
        | View::FinishTrackingForm
        | View::ManualEntryForm
        | View::EditClosedEntryForm => {
            pages::entry_form::EntryFormPage::new(view.title(), &model.entry_form).render(f, area);
        }
        View::Help | View::InsufficientSize => {}
    }
}
