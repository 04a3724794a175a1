mod schema;
mod validate;

pub use schema::{
    loose_bool, parse_int_prefix, parse_props, ActionItem, ActionKind, Button, ButtonSet,
    HttpMethod, NavigationItem, NavigationKind, PaletteColor, RestAssignment, RestCallSettings,
    StyleType, TaskDisplayProgress, WidgetProps,
};
pub use validate::{validate_props, ValidationReport};
