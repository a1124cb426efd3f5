//! RESTful resource and presenter expansion.

use crate::collection::RouteCollection;
use crate::options::RouteOptions;
use crate::target::ucfirst;
use crate::verb::Verb;

const RESOURCE_ACTIONS: [&str; 7] = ["index", "show", "create", "update", "delete", "new", "edit"];

const PRESENTER_ACTIONS: [&str; 8] = [
    "index", "show", "new", "create", "edit", "update", "remove", "delete",
];

impl RouteCollection {
    /// Registers the standard CRUD routes for a resource.
    ///
    /// | action | verb         | pattern          | target                   |
    /// |--------|--------------|------------------|--------------------------|
    /// | index  | GET          | `name`           | `Name::index`            |
    /// | new    | GET          | `name/new`       | `Name::new`              |
    /// | edit   | GET          | `name/(id)/edit` | `Name::edit/$1`          |
    /// | show   | GET          | `name/(id)`      | `Name::show/$1`          |
    /// | create | POST         | `name`           | `Name::create`           |
    /// | update | PUT, PATCH   | `name/(id)`      | `Name::update/$1`        |
    /// | delete | DELETE       | `name/(id)`      | `Name::delete/$1`        |
    ///
    /// `only` and `except` filter the actions. With `websafe`, POST
    /// `name/(id)/delete` and POST `name/(id)` are added for HTML forms.
    pub fn resource(&mut self, name: &str, options: Option<RouteOptions>) -> &mut Self {
        let options = options.unwrap_or_default();
        let controller = controller_name(name, &options);
        let id = self.resource_id(&options);
        let actions = select_actions(&RESOURCE_ACTIONS, &options);
        let has = |action: &str| actions.iter().any(|a| *a == action);

        let opts = Some(options.clone());
        if has("index") {
            self.get(name, format!("{controller}::index"), opts.clone());
        }
        if has("new") {
            self.get(&format!("{name}/new"), format!("{controller}::new"), opts.clone());
        }
        if has("edit") {
            self.get(
                &format!("{name}/{id}/edit"),
                format!("{controller}::edit/$1"),
                opts.clone(),
            );
        }
        if has("show") {
            self.get(&format!("{name}/{id}"), format!("{controller}::show/$1"), opts.clone());
        }
        if has("create") {
            self.post(name, format!("{controller}::create"), opts.clone());
        }
        if has("update") {
            let pattern = format!("{name}/{id}");
            let target = format!("{controller}::update/$1");
            self.match_verbs(&[Verb::Put, Verb::Patch], &pattern, target, opts.clone());
        }
        if has("delete") {
            self.delete(&format!("{name}/{id}"), format!("{controller}::delete/$1"), opts.clone());
        }

        // delete before update: both are POST and share the id prefix
        if options.is_websafe() {
            if has("delete") {
                self.post(
                    &format!("{name}/{id}/delete"),
                    format!("{controller}::delete/$1"),
                    opts.clone(),
                );
            }
            if has("update") {
                self.post(&format!("{name}/{id}"), format!("{controller}::update/$1"), opts);
            }
        }

        self
    }

    /// Registers presenter routes: a resource shaped for HTML forms.
    ///
    /// Every action is reachable with GET or POST only:
    /// `name`, `name/show/(id)`, `name/new`, `name/create`,
    /// `name/edit/(id)`, `name/update/(id)`, `name/remove/(id)`,
    /// `name/delete/(id)`, plus the `name/(id)` and POST `name` shortcuts.
    pub fn presenter(&mut self, name: &str, options: Option<RouteOptions>) -> &mut Self {
        let options = options.unwrap_or_default();
        let controller = controller_name(name, &options);
        let id = self.resource_id(&options);
        let actions = select_actions(&PRESENTER_ACTIONS, &options);
        let has = |action: &str| actions.iter().any(|a| *a == action);

        let opts = Some(options);
        if has("index") {
            self.get(name, format!("{controller}::index"), opts.clone());
        }
        if has("show") {
            self.get(
                &format!("{name}/show/{id}"),
                format!("{controller}::show/$1"),
                opts.clone(),
            );
        }
        if has("new") {
            self.get(&format!("{name}/new"), format!("{controller}::new"), opts.clone());
        }
        if has("create") {
            self.post(&format!("{name}/create"), format!("{controller}::create"), opts.clone());
        }
        if has("edit") {
            self.get(
                &format!("{name}/edit/{id}"),
                format!("{controller}::edit/$1"),
                opts.clone(),
            );
        }
        if has("update") {
            self.post(
                &format!("{name}/update/{id}"),
                format!("{controller}::update/$1"),
                opts.clone(),
            );
        }
        if has("remove") {
            self.get(
                &format!("{name}/remove/{id}"),
                format!("{controller}::remove/$1"),
                opts.clone(),
            );
        }
        if has("delete") {
            self.post(
                &format!("{name}/delete/{id}"),
                format!("{controller}::delete/$1"),
                opts.clone(),
            );
        }
        if has("show") {
            self.get(&format!("{name}/{id}"), format!("{controller}::show/$1"), opts.clone());
        }
        if has("create") {
            self.post(name, format!("{controller}::create"), opts);
        }

        self
    }

    /// The capturing id group: the `placeholder` option or the default
    /// constraint's fragment, wrapped in exactly one pair of parentheses.
    fn resource_id(&self, options: &RouteOptions) -> String {
        let id = options.placeholder.clone().unwrap_or_else(|| {
            self.placeholders()
                .get(&self.config().default_constraint)
                .unwrap_or("(:segment)")
                .to_string()
        });
        format!("({})", id.trim_matches(['(', ')']))
    }
}

fn controller_name(name: &str, options: &RouteOptions) -> String {
    ucfirst(options.controller.as_deref().unwrap_or(name))
}

fn select_actions<'a>(defaults: &[&'a str], options: &RouteOptions) -> Vec<&'a str> {
    let mut actions: Vec<&'a str> = match &options.only {
        Some(only) => defaults
            .iter()
            .copied()
            .filter(|a| only.iter().any(|o| o.as_str() == *a))
            .collect(),
        None => defaults.to_vec(),
    };

    if let Some(except) = &options.except {
        actions.retain(|a| !except.iter().any(|e| e.as_str() == *a));
    }

    actions
}
