//! Macros for declaring state and event labels.

/// Generate a unit enum implementing [`State`](crate::core::State).
///
/// # Example
///
/// ```
/// use stateflow::state_enum;
/// use stateflow::core::State;
///
/// state_enum! {
///     pub enum OrderState {
///         Draft,
///         Submitted,
///         Approved,
///     }
/// }
///
/// assert_eq!(OrderState::Submitted.name(), "Submitted");
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $crate::__label_enum! {
            State;
            $(#[$meta])*
            $vis enum $name { $($(#[$variant_meta])* $variant),* }
        }
    };
}

/// Generate a unit enum implementing [`Event`](crate::core::Event).
///
/// # Example
///
/// ```
/// use stateflow::event_enum;
/// use stateflow::core::Event;
///
/// event_enum! {
///     pub enum OrderEvent {
///         Submit,
///         Approve,
///     }
/// }
///
/// assert_eq!(OrderEvent::Approve.name(), "Approve");
/// ```
#[macro_export]
macro_rules! event_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $crate::__label_enum! {
            Event;
            $(#[$meta])*
            $vis enum $name { $($(#[$variant_meta])* $variant),* }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __label_enum {
    (
        $label:ident;
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::$label for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
