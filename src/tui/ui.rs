use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::{
    BANNER_HEIGHT, ConnectionBanner, MessageList, SIDEBAR_WIDTH, Sidebar, TitleBar, Welcome,
};
use crate::tui::{Focus, TuiState};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

/// Below this width the sidebar is not drawn even when open.
const MIN_WIDTH_FOR_SIDEBAR: u16 = 70;

/// Screen areas for one frame.
struct Areas {
    sidebar: Option<Rect>,
    title: Rect,
    banner: Option<Rect>,
    main: Rect,
    input: Rect,
}

fn split(area: Rect, sidebar_open: bool, show_banner: bool, input_height: impl Fn(u16) -> u16) -> Areas {
    use Constraint::{Length, Min};

    let (sidebar, column) = if sidebar_open && area.width >= MIN_WIDTH_FOR_SIDEBAR {
        let [sidebar, column] = Layout::horizontal([Length(SIDEBAR_WIDTH), Min(0)]).areas(area);
        (Some(sidebar), column)
    } else {
        (None, area)
    };

    let banner_height = if show_banner { BANNER_HEIGHT } else { 0 };
    let [title, banner, main, input] = Layout::vertical([
        Length(1),
        Length(banner_height),
        Min(0),
        Length(input_height(column.width)),
    ])
    .areas(column);

    Areas {
        sidebar,
        title,
        banner: show_banner.then_some(banner),
        main,
        input,
    }
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    let areas = split(
        frame.area(),
        tui.sidebar.open,
        app.connection_error,
        |width| tui.input_box.calculate_height(width),
    );

    if let Some(area) = areas.sidebar {
        let focused = tui.focus == Focus::Sidebar;
        Sidebar::new(&mut tui.sidebar, app.active_session_id.as_deref(), focused)
            .render(frame, area);
    }

    let session_title = app.active_session().map(|s| s.title.as_str());
    let hints = tui.hints();
    TitleBar::new(session_title, &app.status_message, app.is_loading, hints)
        .render(frame, areas.title);

    if let Some(area) = areas.banner {
        ConnectionBanner::new(app.base_url()).render(frame, area);
    }

    if app.welcome_visible() {
        Welcome::new(&tui.welcome, tui.focus == Focus::Suggestions).render(frame, areas.main);
    } else {
        MessageList::new(
            &mut tui.message_list,
            &app.messages,
            app.is_loading,
            spinner_frame,
        )
        .render(frame, areas.main);
    }

    tui.input_box.render(frame, areas.input);
}
