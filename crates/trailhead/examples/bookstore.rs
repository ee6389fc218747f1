//! A small route table exercised without any HTTP transport.
//!
//! Run with: `cargo run --example bookstore`

use trailhead::{Method, RequestContext, RouteGroup, Router, RouterConfig};

fn request_log(ctx: &mut RequestContext) {
    let line = format!("{} {}", ctx.method(), ctx.path());
    ctx.next();
    println!("{line} -> {}", ctx.response().status());
}

fn list_books(ctx: &mut RequestContext) {
    ctx.response_mut().write("all books");
}

fn get_book(ctx: &mut RequestContext) {
    let id = ctx.param("id").unwrap_or("?").to_string();
    ctx.response_mut().write(format!("book {id}"));
}

fn cover_image(ctx: &mut RequestContext) {
    let path = ctx.wildcard().unwrap_or("").to_string();
    ctx.response_mut().write(format!("image bytes for {path}"));
}

fn main() {
    let mut router = Router::with_config(RouterConfig::new().handle_method_not_allowed(true));
    router.use_middleware(request_log);

    let api = RouteGroup::new("/api/v1")
        .get("/books", list_books)
        .get("/books/:id", get_book)
        .get("/covers/*", cover_image);
    router.include(api).expect("route table is conflict-free");

    let dispatcher = router.finalize();

    for (method, path) in [
        (Method::GET, "/api/v1/books"),
        (Method::GET, "/api/v1/books/42"),
        (Method::GET, "/api/v1/covers/large/42.png"),
        (Method::GET, "/api/v1/books/"),
        (Method::DELETE, "/api/v1/books"),
        (Method::GET, "/api/v1/missing"),
    ] {
        let resp = dispatcher.handle(method, path);
        println!("  body: {}", String::from_utf8_lossy(resp.body()));
    }
}
