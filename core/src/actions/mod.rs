//! Per-domain method groups.
//!
//! Each group is generated from its table of remote method names by
//! `api_group!`; every generated method forwards to `VkApiClient::call`.

macro_rules! api_group {
    (
        $(#[$meta:meta])*
        $group:ident => $prefix:literal {
            $( $(#[$method_meta:meta])* $name:ident => $remote:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $group<'a> {
            client: &'a $crate::client::VkApiClient,
        }

        impl<'a> $group<'a> {
            /// Full remote names of every method in this group.
            pub const METHODS: &'static [&'static str] = &[$(concat!($prefix, ".", $remote)),+];

            pub(crate) fn new(client: &'a $crate::client::VkApiClient) -> Self {
                Self { client }
            }

            $(
                $(#[$method_meta])*
                pub fn $name<T: $crate::transport::Transport + ?Sized>(
                    &self,
                    transport: &T,
                    access_token: &str,
                    params: &$crate::params::Params,
                ) -> Result<serde_json::Value, $crate::error::VkError> {
                    self.client
                        .call(transport, concat!($prefix, ".", $remote), access_token, params)
                }
            )+
        }
    };
}

mod docs;
pub mod enums;
mod friends;
mod newsfeed;
mod pages;

pub use docs::Docs;
pub use friends::Friends;
pub use newsfeed::Newsfeed;
pub use pages::Pages;
