//! Typed values for enumerated method parameters.
//!
//! Every type converts into a [`ParamValue`], so it can be passed straight to
//! `Params::with`.

use serde::{Deserialize, Serialize};

use crate::params::ParamValue;

macro_rules! param_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $( $(#[$variant_meta:meta])* $variant:ident = $wire:literal, )+ }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$variant_meta])* #[serde(rename = $wire)] $variant, )+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $wire, )+
                }
            }
        }

        impl From<$name> for ParamValue {
            fn from(value: $name) -> Self {
                ParamValue::from(value.as_str())
            }
        }
    };
}

param_enum! {
    /// Declension case for user names (`name_case`).
    NameCase {
        Nominative = "nom",
        Genitive = "gen",
        Dative = "dat",
        Accusative = "acc",
        Instrumental = "ins",
        /// Prepositional.
        Ablative = "abl",
    }
}

param_enum! {
    /// Sort order for `friends.get`.
    FriendsOrder {
        /// Only honoured when `fields` is set.
        Name = "name",
        Hints = "hints",
    }
}

param_enum! {
    /// Item type for `newsfeed.ignoreItem` / `newsfeed.unignoreItem`.
    NewsfeedItemType {
        Wall = "wall",
        Tag = "tag",
        ProfilePhoto = "profilephoto",
        Video = "video",
        Audio = "audio",
    }
}

param_enum! {
    /// Object type for `newsfeed.unsubscribe`.
    UnsubscribeType {
        Note = "note",
        Photo = "photo",
        Post = "post",
        Topic = "topic",
        Video = "video",
    }
}

param_enum! {
    /// Who may view or edit a wiki page (`pages.saveAccess`).
    PageAccess {
        Managers = "0",
        Members = "1",
        Everyone = "2",
    }
}
