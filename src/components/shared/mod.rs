mod category_card;
mod category_list;
mod floating_action_button;
mod form_error;
mod go_back_button;
mod note_card;
mod note_example_item;
mod note_form;
mod notes_list;
mod skeleton_card;
mod voice_recorder;

pub use category_card::*;
pub use category_list::*;
pub use floating_action_button::*;
pub use form_error::*;
pub use go_back_button::*;
pub use note_card::*;
pub use note_example_item::*;
pub use note_form::*;
pub use notes_list::*;
pub use skeleton_card::*;
pub use voice_recorder::*;
