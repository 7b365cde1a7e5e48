//! Seeds a users table by hand and through a factory.
//!
//! Run with `RUST_LOG=recordbase=debug cargo run --example users` to see the
//! table's logging.

use recordbase::{Factory, Model, Record, StoreError, Table};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Clone, Debug, Record)]
struct User {
    banned: bool,
    password: String,
    username: String,
}

trait UserActions {
    fn ban(&mut self) -> Result<&mut Self, StoreError>;
    fn unban(&mut self) -> Result<&mut Self, StoreError>;
}

impl UserActions for Model<User> {
    fn ban(&mut self) -> Result<&mut Self, StoreError> {
        self.record_mut()?.banned = true;
        self.save()?;
        Ok(self)
    }

    fn unban(&mut self) -> Result<&mut Self, StoreError> {
        self.record_mut()?.banned = false;
        self.save()?;
        Ok(self)
    }
}

trait UserStates {
    fn banned(&mut self) -> &mut Self;
}

impl UserStates for Factory<User> {
    fn banned(&mut self) -> &mut Self {
        self.state([("banned", true)])
    }
}

fn describe(user: &Model<User>) -> Result<String, StoreError> {
    let record = user.record()?;
    let status = if record.banned { "banned" } else { "unbanned" };
    Ok(format!("{}: {}", record.username, status))
}

fn main() -> Result<(), StoreError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let users = Table::<User>::new();

    // A user with manually passed data, e.g. coming from a form
    let mut user = users.insert(User {
        banned: false,
        username: "Test username".to_string(),
        password: "8923n_NV093J.".to_string(),
    });

    user.ban()?;
    println!("{}", describe(&user)?);

    user.unban()?;
    println!("{}", describe(&user)?);

    // Ten banned users through the factory
    let mut factory = Factory::new(&users, || User {
        banned: false,
        password: Uuid::new_v4().simple().to_string(),
        username: format!("user-{}", &Uuid::new_v4().simple().to_string()[..6]),
    });
    factory.banned().create_many(10)?;

    println!("{} users, {} banned", users.count(), users.where_eq("banned", true).count());
    println!("{}", serde_json::to_string_pretty(&users.last()).unwrap_or_default());

    Ok(())
}
