mod common;

use assert_json_diff::assert_json_eq;
use bookportal_core::{
    CreateBook, CreateFeedback, ErrorKind, FeedbackFilters, ModerateFeedback, PageRequest, Role,
    UpdateBook, UpdateUser, UserFilters,
};
use common::{
    book_json, feedback_json, page_json, portal, principal_json, received, sign_in,
};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_feedback_list_uses_page_and_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feedback/all-reviews"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![], 0, 1, 10)))
        .mount(&server)
        .await;

    let (portal, _) = portal(&server);
    sign_in(&portal, Role::Admin, "tok");
    portal
        .feedback()
        .list(&FeedbackFilters::page(1, 10))
        .await
        .unwrap();

    let requests = received(&server, "GET", "/feedback/all-reviews").await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.query(), Some("page=1&limit=10"));
}

#[tokio::test]
async fn test_feedback_search_follows_paging() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feedback/all-reviews"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![], 0, 1, 10)))
        .mount(&server)
        .await;

    let (portal, _) = portal(&server);
    sign_in(&portal, Role::Admin, "tok");
    let filters = FeedbackFilters {
        search: Some("test".into()),
        ..FeedbackFilters::page(1, 10)
    };
    portal.feedback().list(&filters).await.unwrap();

    let requests = received(&server, "GET", "/feedback/all-reviews").await;
    assert_eq!(requests[0].url.query(), Some("page=1&limit=10&search=test"));
}

#[tokio::test]
async fn test_bulk_delete_feedback_sends_ids_in_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/feedback/bulk"))
        .and(body_json(json!({"feedbackIds": [1, 2, 3]})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "3 feedback deleted"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (portal, _) = portal(&server);
    sign_in(&portal, Role::Admin, "tok");
    let response = portal.feedback().bulk_delete(&[1, 2, 3]).await.unwrap();
    assert_eq!(response.message.as_deref(), Some("3 feedback deleted"));
}

#[tokio::test]
async fn test_bulk_delete_books_and_users_send_ids() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/books/bulk"))
        .and(body_json(json!({"ids": [4, 5]})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/auth/users/bulk"))
        .and(body_json(json!({"ids": [8]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let (portal, _) = portal(&server);
    sign_in(&portal, Role::Admin, "tok");
    assert_eq!(portal.books().bulk_delete(&[4, 5]).await.unwrap().message, None);
    portal.users().bulk_delete(&[8]).await.unwrap();

    let err = portal.users().bulk_delete(&[]).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_duplicate_feedback_message_reaches_caller() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/feedback"))
        .respond_with(ResponseTemplate::new(409).set_body_json(
            json!({"statusCode": 409, "message": "You have already left feedback for this book"}),
        ))
        .mount(&server)
        .await;

    let (portal, navigator) = portal(&server);
    sign_in(&portal, Role::User, "tok");
    let err = portal
        .feedback()
        .create(&CreateFeedback {
            rating: 4,
            comment: "Again".into(),
            book_id: 1,
        })
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(409));
    assert!(err.is_conflict());
    assert_eq!(err.to_string(), "You have already left feedback for this book");
    assert_eq!(navigator.count(), 0);
}

#[tokio::test]
async fn test_validation_message_array_is_joined() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/books/3"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": ["title should not be empty", "isbn must be an ISBN"],
            "error": "Bad Request"
        })))
        .mount(&server)
        .await;

    let (portal, _) = portal(&server);
    sign_in(&portal, Role::User, "tok");
    let err = portal
        .books()
        .update(
            3,
            &UpdateBook {
                author: Some("Someone".into()),
                ..UpdateBook::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(
        err.message(),
        "title should not be empty, isbn must be an ISBN"
    );
}

#[tokio::test]
async fn test_invalid_input_is_rejected_before_sending() {
    let server = MockServer::start().await;
    let (portal, _) = portal(&server);
    sign_in(&portal, Role::User, "tok");

    let err = portal
        .feedback()
        .create(&CreateFeedback {
            rating: 6,
            comment: "Too good".into(),
            book_id: 1,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(err.message(), "Rating must be between 1 and 5");

    let err = portal
        .books()
        .create(&CreateBook {
            title: "Dune".into(),
            author: "Frank Herbert".into(),
            isbn: "12345".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_moderate_uses_patch() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/feedback/12/moderate"))
        .and(body_json(json!({"comment": "[removed]"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(feedback_json(12, 3, 2, "[removed]")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (portal, _) = portal(&server);
    sign_in(&portal, Role::Admin, "tok");
    let feedback = portal
        .feedback()
        .moderate(
            12,
            &ModerateFeedback {
                comment: Some("[removed]".into()),
                ..ModerateFeedback::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(feedback.comment, "[removed]");
}

#[tokio::test]
async fn test_book_reviews_and_stats_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feedback/book/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
            vec![feedback_json(1, 3, 5, "Great")],
            1,
            1,
            5,
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/feedback/book/3/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "averageRating": 4.5,
            "totalReviews": 2,
            "ratingDistribution": {"4": 1, "5": 1}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/feedback/my-feedback"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![], 0, 1, 10)))
        .mount(&server)
        .await;

    let (portal, _) = portal(&server);
    sign_in(&portal, Role::User, "tok");

    let reviews = portal
        .feedback()
        .for_book(3, &PageRequest::new(1, 5))
        .await
        .unwrap()
        .data;
    assert_eq!(reviews.data[0].book_id, 3);

    let stats = portal.feedback().book_stats(3).await.unwrap().data;
    assert_eq!(stats.total_reviews, 2);
    assert_eq!(stats.rating_distribution["5"], 1);

    let mine = portal.feedback().mine(&PageRequest::new(1, 10)).await.unwrap().data;
    assert!(mine.is_empty());

    let requests = received(&server, "GET", "/feedback/book/3").await;
    assert_eq!(requests[0].url.query(), Some("page=1&limit=5"));
}

#[tokio::test]
async fn test_users_list_shapes_are_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            principal_json(1, "admin"),
            principal_json(2, "user"),
            principal_json(3, "user"),
        ])))
        .mount(&server)
        .await;

    let (portal, _) = portal(&server);
    sign_in(&portal, Role::Admin, "tok");
    let filters = UserFilters {
        role: Some(Role::User),
        ..UserFilters::default()
    };
    let users = portal.users().list(&filters).await.unwrap().data;
    assert_eq!(users.total, 3);
    assert_eq!(users.page, 1);
    assert_eq!(users.total_pages, 1);
    assert_eq!(users.data[0].role, Role::Admin);

    let requests = received(&server, "GET", "/auth/users").await;
    assert_eq!(requests[0].url.query(), Some("role=user"));
}

#[tokio::test]
async fn test_book_list_filters_reach_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/books"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
            vec![book_json(1, "Dune")],
            1,
            1,
            10,
        )))
        .mount(&server)
        .await;

    let (portal, _) = portal(&server);
    sign_in(&portal, Role::User, "tok");
    let filters = bookportal_core::BookFilters {
        title: Some("Dune".into()),
        exclude_created_by: Some(1),
        ..bookportal_core::BookFilters::page(1, 10)
    };
    portal.books().list(&filters).await.unwrap();

    let requests = received(&server, "GET", "/books").await;
    assert_eq!(
        requests[0].url.query(),
        Some("title=Dune&page=1&limit=10&excludeCreatedBy=1")
    );
}

#[tokio::test]
async fn test_user_update_sends_only_changed_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/auth/users/6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(principal_json(6, "admin")))
        .expect(1)
        .mount(&server)
        .await;

    let (portal, _) = portal(&server);
    sign_in(&portal, Role::Admin, "tok");
    let user = portal
        .users()
        .update(
            6,
            &UpdateUser {
                last_name: Some("Hopper".into()),
                role: Some(Role::Admin),
                ..UpdateUser::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(user.role, Role::Admin);

    let requests = received(&server, "PATCH", "/auth/users/6").await;
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_json_eq!(body, json!({"lastName": "Hopper", "role": "admin"}));
}
