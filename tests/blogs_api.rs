mod common;

use actix_web::http::{header, StatusCode};
use actix_web::test;
use bloglist_service::app::build_app;
use bloglist_service::database::BlogStore;
use mongodb::bson::oid::ObjectId;
use serde_json::{json, Value};

use common::{setup, INITIAL_BLOGS};

#[actix_web::test]
async fn blogs_are_returned_as_json() {
    let ctx = setup().await;
    let app = test::init_service(build_app(ctx.state())).await;

    let req = test::TestRequest::get().uri("/api/blogs").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers().get(header::CONTENT_TYPE).unwrap();
    assert!(content_type.to_str().unwrap().starts_with("application/json"));

    let body: Vec<Value> = test::read_body_json(resp).await;
    assert_eq!(body.len(), INITIAL_BLOGS.len());
}

#[actix_web::test]
async fn a_specific_blog_is_within_the_returned_blogs() {
    let ctx = setup().await;
    let app = test::init_service(build_app(ctx.state())).await;

    let req = test::TestRequest::get().uri("/api/blogs").to_request();
    let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;

    let react = body
        .iter()
        .find(|b| b["title"] == "React patterns")
        .expect("seeded blog missing");
    assert_eq!(react["likes"], 7);
    assert_eq!(react["user"]["username"], "root");
    assert_eq!(react["user"]["name"], "Superuser");
    assert!(react["user"].get("passwordHash").is_none());
}

#[actix_web::test]
async fn blogs_expose_id_not_internal_id() {
    let ctx = setup().await;
    let app = test::init_service(build_app(ctx.state())).await;

    let req = test::TestRequest::get().uri("/api/blogs").to_request();
    let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;

    for blog in &body {
        assert!(blog["id"].is_string());
        assert!(blog.get("_id").is_none());
        assert!(blog.get("__v").is_none());
    }
}

#[actix_web::test]
async fn a_valid_blog_can_be_added() {
    let ctx = setup().await;
    let app = test::init_service(build_app(ctx.state())).await;

    let req = test::TestRequest::post()
        .uri("/api/blogs")
        .insert_header((header::AUTHORIZATION, ctx.bearer(&ctx.root)))
        .set_json(json!({
            "title": "Type wars",
            "author": "Robert C. Martin",
            "url": "http://blog.cleancoder.com/uncle-bob/2016/05/01/TypeWars.html",
            "likes": 2
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["title"], "Type wars");
    assert_eq!(created["likes"], 2);
    assert_eq!(created["user"]["username"], "root");

    let blogs = ctx.blogs_in_db().await;
    assert_eq!(blogs.len(), INITIAL_BLOGS.len() + 1);
    assert!(blogs.iter().any(|b| b.title == "Type wars"));

    let created_id = ObjectId::parse_str(created["id"].as_str().unwrap()).unwrap();
    let owner = ctx.store_user(ctx.root.id).await;
    assert!(owner.blogs.contains(&created_id));
}

#[actix_web::test]
async fn likes_default_to_zero() {
    let ctx = setup().await;
    let app = test::init_service(build_app(ctx.state())).await;

    let req = test::TestRequest::post()
        .uri("/api/blogs")
        .insert_header((header::AUTHORIZATION, ctx.bearer(&ctx.other)))
        .set_json(json!({
            "title": "Unliked",
            "author": "Nobody",
            "url": "http://example.com/unliked"
        }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(created["likes"], 0);

    let stored = ctx
        .blogs_in_db()
        .await
        .into_iter()
        .find(|b| b.title == "Unliked")
        .unwrap();
    assert_eq!(stored.likes, 0);
}

#[actix_web::test]
async fn adding_a_blog_without_token_fails() {
    let ctx = setup().await;
    let app = test::init_service(build_app(ctx.state())).await;

    let req = test::TestRequest::post()
        .uri("/api/blogs")
        .set_json(json!({ "title": "No token", "url": "http://example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("unauthorized"));
    assert_eq!(ctx.blogs_in_db().await.len(), INITIAL_BLOGS.len());
}

#[actix_web::test]
async fn adding_a_blog_with_invalid_token_fails() {
    let ctx = setup().await;
    let app = test::init_service(build_app(ctx.state())).await;

    let req = test::TestRequest::post()
        .uri("/api/blogs")
        .insert_header((header::AUTHORIZATION, "Bearer not-a-real-token"))
        .set_json(json!({ "title": "Bad token", "url": "http://example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(ctx.blogs_in_db().await.len(), INITIAL_BLOGS.len());
}

#[actix_web::test]
async fn blog_without_title_is_not_added() {
    let ctx = setup().await;
    let app = test::init_service(build_app(ctx.state())).await;

    let req = test::TestRequest::post()
        .uri("/api/blogs")
        .insert_header((header::AUTHORIZATION, ctx.bearer(&ctx.root)))
        .set_json(json!({ "title": "", "author": "Anon", "url": "http://example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Blog validation failed"));
    assert_eq!(ctx.blogs_in_db().await.len(), INITIAL_BLOGS.len());
}

#[actix_web::test]
async fn blog_without_url_is_not_added() {
    let ctx = setup().await;
    let app = test::init_service(build_app(ctx.state())).await;

    let req = test::TestRequest::post()
        .uri("/api/blogs")
        .insert_header((header::AUTHORIZATION, ctx.bearer(&ctx.root)))
        .set_json(json!({ "title": "Missing url" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("url"));
    assert_eq!(ctx.blogs_in_db().await.len(), INITIAL_BLOGS.len());
}

#[actix_web::test]
async fn malformed_json_is_rejected() {
    let ctx = setup().await;
    let app = test::init_service(build_app(ctx.state())).await;

    let req = test::TestRequest::post()
        .uri("/api/blogs")
        .insert_header((header::AUTHORIZATION, ctx.bearer(&ctx.root)))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{\"title\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn owner_can_delete_a_blog() {
    let ctx = setup().await;
    let app = test::init_service(build_app(ctx.state())).await;
    let to_delete = ctx.blogs_in_db().await[0].clone();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/blogs/{}", to_delete.id.to_hex()))
        .insert_header((header::AUTHORIZATION, ctx.bearer(&ctx.root)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let deleted = resp.headers().get("X-Deleted-Resource").unwrap();
    assert_eq!(deleted.to_str().unwrap(), to_delete.id.to_hex());
    assert!(test::read_body(resp).await.is_empty());

    let blogs = ctx.blogs_in_db().await;
    assert_eq!(blogs.len(), INITIAL_BLOGS.len() - 1);
    assert!(!blogs.iter().any(|b| b.id == to_delete.id));
    assert!(!ctx.store_user(ctx.root.id).await.blogs.contains(&to_delete.id));
}

#[actix_web::test]
async fn non_owner_cannot_delete_a_blog() {
    let ctx = setup().await;
    let app = test::init_service(build_app(ctx.state())).await;
    let target = ctx.blogs_in_db().await[0].clone();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/blogs/{}", target.id.to_hex()))
        .insert_header((header::AUTHORIZATION, ctx.bearer(&ctx.other)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(ctx.blogs_in_db().await.len(), INITIAL_BLOGS.len());
}

#[actix_web::test]
async fn deleting_without_token_fails() {
    let ctx = setup().await;
    let app = test::init_service(build_app(ctx.state())).await;
    let target = ctx.blogs_in_db().await[0].clone();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/blogs/{}", target.id.to_hex()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(ctx.blogs_in_db().await.len(), INITIAL_BLOGS.len());
}

#[actix_web::test]
async fn deleting_with_malformatted_id_fails() {
    let ctx = setup().await;
    let app = test::init_service(build_app(ctx.state())).await;

    let req = test::TestRequest::delete()
        .uri("/api/blogs/5a3d5da59070081a82a3445")
        .insert_header((header::AUTHORIZATION, ctx.bearer(&ctx.root)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "malformatted id");
}

#[actix_web::test]
async fn likes_can_be_updated() {
    let ctx = setup().await;
    let app = test::init_service(build_app(ctx.state())).await;
    let blog = ctx.blogs_in_db().await[0].clone();

    let submitted = json!({
        "id": blog.id.to_hex(),
        "title": blog.title,
        "author": blog.author,
        "url": blog.url,
        "likes": blog.likes + 1,
        "user": blog.user.map(|u| u.to_hex()),
    });

    let req = test::TestRequest::put()
        .uri(&format!("/api/blogs/{}", blog.id.to_hex()))
        .set_json(&submitted)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, submitted);

    let stored = ctx.store.find_blog(blog.id).await.unwrap().unwrap();
    assert_eq!(stored.likes, blog.likes + 1);
}

#[actix_web::test]
async fn update_with_empty_title_fails_validation() {
    let ctx = setup().await;
    let app = test::init_service(build_app(ctx.state())).await;
    let blog = ctx.blogs_in_db().await[0].clone();

    let req = test::TestRequest::put()
        .uri(&format!("/api/blogs/{}", blog.id.to_hex()))
        .set_json(json!({ "title": "", "url": blog.url }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let stored = ctx.store.find_blog(blog.id).await.unwrap().unwrap();
    assert_eq!(stored.title, blog.title);
}

#[actix_web::test]
async fn update_with_null_required_fields_fails_validation() {
    let ctx = setup().await;
    let app = test::init_service(build_app(ctx.state())).await;
    let blog = ctx.blogs_in_db().await[0].clone();

    let req = test::TestRequest::put()
        .uri(&format!("/api/blogs/{}", blog.id.to_hex()))
        .set_json(json!({ "title": null, "url": null }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Blog validation failed"));
    assert!(error.contains("title"));
    assert!(error.contains("url"));

    let stored = ctx.store.find_blog(blog.id).await.unwrap().unwrap();
    assert_eq!(stored.title, blog.title);
    assert_eq!(stored.url, blog.url);
}

#[actix_web::test]
async fn update_with_malformatted_id_fails() {
    let ctx = setup().await;
    let app = test::init_service(build_app(ctx.state())).await;

    let req = test::TestRequest::put()
        .uri("/api/blogs/not-an-id")
        .set_json(json!({ "likes": 1 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "malformatted id");
}

#[actix_web::test]
async fn update_of_missing_blog_is_not_found() {
    let ctx = setup().await;
    let app = test::init_service(build_app(ctx.state())).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/blogs/{}", ObjectId::new().to_hex()))
        .set_json(json!({ "likes": 1 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn unknown_endpoint_returns_404() {
    let ctx = setup().await;
    let app = test::init_service(build_app(ctx.state())).await;

    let req = test::TestRequest::get().uri("/api/nothing-here").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "unknown endpoint" }));
}
