//! Page routes and access rules
//!
//! Every page declares an [`Access`] level. [`resolve_access`] is evaluated
//! on each navigation: anonymous visitors of a protected page go to `/login`,
//! non-admins visiting an admin page go to `/pos`.

use crate::models::Me;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    Public,
    Authenticated,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Pos,
    SalesToday,
    Cash,
    Stock,
    NewProduct,
    Promotions,
    Categories,
    Dashboard,
    Audit,
    Admin,
    Profile,
}

impl Route {
    pub const ALL: [Route; 12] = [
        Route::Login,
        Route::Pos,
        Route::SalesToday,
        Route::Cash,
        Route::Stock,
        Route::NewProduct,
        Route::Promotions,
        Route::Categories,
        Route::Dashboard,
        Route::Audit,
        Route::Admin,
        Route::Profile,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Pos => "/pos",
            Route::SalesToday => "/ventas/hoy",
            Route::Cash => "/caja",
            Route::Stock => "/stock",
            Route::NewProduct => "/productos/nuevo",
            Route::Promotions => "/promos",
            Route::Categories => "/categorias",
            Route::Dashboard => "/dashboard",
            Route::Audit => "/bitacora",
            Route::Admin => "/admin",
            Route::Profile => "/perfil",
        }
    }

    /// Navigation label
    pub fn label(self) -> &'static str {
        match self {
            Route::Login => "Ingresar",
            Route::Pos => "POS",
            Route::SalesToday => "Ventas de hoy",
            Route::Cash => "Caja",
            Route::Stock => "Stock",
            Route::NewProduct => "Nuevo producto",
            Route::Promotions => "Promociones",
            Route::Categories => "Categorías",
            Route::Dashboard => "Dashboard",
            Route::Audit => "Bitácora",
            Route::Admin => "Usuarios",
            Route::Profile => "Perfil",
        }
    }

    pub fn access(self) -> Access {
        match self {
            Route::Login => Access::Public,
            Route::NewProduct | Route::Promotions | Route::Categories | Route::Admin => {
                Access::Admin
            }
            _ => Access::Authenticated,
        }
    }
}

/// Outcome of a navigation check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Allow,
    Redirect(Route),
    /// Logged in but the current user is still loading
    Pending,
}

/// `me_loading` is true while `/auth/me/` is in flight. A missing user after
/// that request finished counts as a non-admin.
pub fn resolve_access(route: Route, logged_in: bool, me: Option<&Me>, me_loading: bool) -> Guard {
    match route.access() {
        Access::Public if logged_in => Guard::Redirect(Route::Pos),
        Access::Public => Guard::Allow,
        _ if !logged_in => Guard::Redirect(Route::Login),
        Access::Authenticated => Guard::Allow,
        Access::Admin => match me {
            Some(me) if me.is_admin() => Guard::Allow,
            None if me_loading => Guard::Pending,
            _ => Guard::Redirect(Route::Pos),
        },
    }
}

/// Links shown in the navigation bar for this user
pub fn nav_routes(me: Option<&Me>) -> Vec<Route> {
    let admin = me.map(Me::is_admin).unwrap_or(false);
    Route::ALL
        .iter()
        .copied()
        .filter(|r| match r.access() {
            Access::Public => false,
            Access::Authenticated => true,
            Access::Admin => admin,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn me(role: &str) -> Me {
        Me {
            id: 1,
            username: "u".into(),
            email: String::new(),
            role: Role::from_code(role),
            is_staff: false,
            is_superuser: false,
            is_active: true,
        }
    }

    #[test]
    fn test_anonymous_visitors_go_to_login() {
        for route in Route::ALL {
            let guard = resolve_access(route, false, None, false);
            if route == Route::Login {
                assert_eq!(guard, Guard::Allow);
            } else {
                assert_eq!(guard, Guard::Redirect(Route::Login), "{:?}", route);
            }
        }
    }

    #[test]
    fn test_sellers_bounce_off_admin_pages() {
        let seller = me("SELLER");
        assert_eq!(
            resolve_access(Route::Promotions, true, Some(&seller), false),
            Guard::Redirect(Route::Pos)
        );
        assert_eq!(resolve_access(Route::Stock, true, Some(&seller), false), Guard::Allow);
        assert_eq!(resolve_access(Route::Audit, true, Some(&seller), false), Guard::Allow);
        assert_eq!(
            resolve_access(Route::Admin, true, Some(&me("owner")), false),
            Guard::Allow
        );
        assert_eq!(resolve_access(Route::Categories, true, None, true), Guard::Pending);
    }

    #[test]
    fn test_failed_user_lookup_leaves_admin_pages() {
        for route in [Route::Promotions, Route::Categories, Route::Admin, Route::NewProduct] {
            assert_eq!(
                resolve_access(route, true, None, false),
                Guard::Redirect(Route::Pos),
                "{:?}",
                route
            );
        }
        assert_eq!(resolve_access(Route::Dashboard, true, None, false), Guard::Allow);
    }

    #[test]
    fn test_logged_in_user_skips_login() {
        assert_eq!(
            resolve_access(Route::Login, true, None, false),
            Guard::Redirect(Route::Pos)
        );
    }

    #[test]
    fn test_paths_are_distinct() {
        let mut paths: Vec<&str> = Route::ALL.iter().map(|r| r.path()).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), Route::ALL.len());
        assert_eq!(Route::SalesToday.path(), "/ventas/hoy");
    }

    #[test]
    fn test_nav_routes_hide_admin_pages() {
        let seller_nav = nav_routes(Some(&me("SELLER")));
        assert!(seller_nav.contains(&Route::Pos));
        assert!(!seller_nav.contains(&Route::Admin));
        assert!(!seller_nav.contains(&Route::Login));
        assert_eq!(nav_routes(Some(&me("ADMIN"))).len(), 11);
    }
}
