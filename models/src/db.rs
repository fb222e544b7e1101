use std::collections::HashMap;

use mongodb::{
    Client, Collection,
    bson::{Document, doc, oid::ObjectId},
    options::ClientOptions,
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{error, instrument};

pub fn get_collection<T>(client: &Client, collection_name: &str) -> Collection<T>
where
    T: Send + Sync + DeserializeOwned + Serialize,
{
    let db = client
        .default_database()
        .expect("database needs to be defined in the URI");

    db.collection::<T>(collection_name)
}

pub async fn client(uri: &str) -> mongodb::error::Result<Client> {
    let mut client_options = ClientOptions::parse(uri).await?;

    client_options.app_name = Some(env!("CARGO_CRATE_NAME").to_string());

    let client = Client::with_options(client_options)?;

    // Ping the server to confirm the cluster is reachable
    client
        .default_database()
        .expect("database needs to be defined in the URI")
        .run_command(doc! {"ping": 1})
        .await?;

    Ok(client)
}

#[instrument(skip_all, fields(collection = collection.name(), query = query.to_string()))]
pub async fn get_from_cache_or_collection<T>(
    collection: &Collection<T>,
    query: Document,
    hash: &mut HashMap<ObjectId, T>,
    id: ObjectId,
) -> Option<T>
where
    T: DeserializeOwned + Send + Sync + Clone,
{
    let item = if let Some(item) = hash.get(&id) {
        item.to_owned()
    } else {
        let item = match collection.find_one(query).await {
            Ok(i) => match i {
                Some(i) => i,
                None => {
                    error!("enoent record");
                    return None;
                }
            },
            Err(e) => {
                error!(error = ?e, "unable to query database");
                return None;
            }
        };

        hash.insert(id, item.clone());
        item
    };

    Some(item)
}
