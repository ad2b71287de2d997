use mongodb::{Database, IndexModel, options::IndexOptions};
use tracing::info;

use crate::models::{Admin, Application, Hostel, Realtor, Student};

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // Realtors
    create_indexes(
        db,
        Realtor::COLLECTION,
        vec![
            index_unique(bson::doc! { "email": 1 }),
            index(bson::doc! { "status": 1, "created_at": -1 }),
        ],
    )
    .await?;

    // Admins
    create_indexes(
        db,
        Admin::COLLECTION,
        vec![index_unique(bson::doc! { "email": 1 })],
    )
    .await?;

    // Students
    create_indexes(
        db,
        Student::COLLECTION,
        vec![index_unique(bson::doc! { "email": 1 })],
    )
    .await?;

    // Hostels
    create_indexes(
        db,
        Hostel::COLLECTION,
        vec![
            index(bson::doc! { "realtor_id": 1, "created_at": -1 }),
            index(bson::doc! { "available": 1, "price": 1 }),
        ],
    )
    .await?;

    // Applications
    create_indexes(
        db,
        Application::COLLECTION,
        vec![
            index_unique(bson::doc! { "application_id": 1 }),
            index(bson::doc! { "realtor.realtor_id": 1, "status": 1 }),
            index(bson::doc! { "hostel.hostel_id": 1 }),
            index(bson::doc! { "student_info.email": 1, "submitted_at": -1 }),
        ],
    )
    .await?;

    info!("All indexes ensured");
    Ok(())
}

fn index(keys: bson::Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

fn index_unique(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    db.collection::<bson::Document>(collection)
        .create_indexes(indexes)
        .await?;
    info!(collection, "Indexes created");
    Ok(())
}
