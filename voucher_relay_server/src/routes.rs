//! Route handlers for the relay: the health check, the `null` 404, and the two voucher routes.
//!
//! The voucher handlers only read the query string and hand off to [`VoucherFlowApi`]; the partner calls they await
//! do not block the worker thread.
use actix_web::{get, http::header::ContentType, web, web::ServiceConfig, HttpRequest, HttpResponse, Responder};
use log::*;
use voucher_engine::{traits::PartnerGateway, VoucherFlowApi};

use crate::{data_objects::VoucherQuery, errors::ServerError};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

// ----------------------------------------------   Not found  -------------------------------------------------
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    debug!("💻️ No route for {} {}", req.method(), req.path());
    HttpResponse::NotFound().insert_header(ContentType::json()).body("null")
}

// ----------------------------------------------   Vouchers  --------------------------------------------------
/// Registers the voucher routes. Mount this inside a scope for the route prefix.
pub fn configure_voucher_routes<B: PartnerGateway + 'static>(cfg: &mut ServiceConfig) {
    cfg.service(GetVoucherRoute::<B>::new()).service(UseVouchersRoute::<B>::new());
}

route!(get_voucher => Get "/voucher/get" impl PartnerGateway);
/// Route handler for voucher lookups.
///
/// Fetches the voucher from the partner and checks that it is neither expired nor used. Answers `200` with
/// `{"success":true,"voucher":{..}}` or a `{"success":false,..}` failure, and `500` if the partner could not be
/// reached or misbehaved.
pub async fn get_voucher<B: PartnerGateway>(
    req: HttpRequest,
    api: web::Data<VoucherFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let query = VoucherQuery::parse(req.query_string());
    info!("💻️ GET {} ({query})", req.path());
    let result = api.get(query.id).await?;
    Ok(HttpResponse::Ok().json(result))
}

route!(use_vouchers => Get "/voucher/use" impl PartnerGateway);
/// Route handler for voucher redemption.
///
/// `cartAmount` is read leniently; when it is not a number the partner receives `null` and decides. Answers `200`
/// with `{"success":true}` or a `{"success":false,..}` failure, and `500` on transport errors.
pub async fn use_vouchers<B: PartnerGateway>(
    req: HttpRequest,
    api: web::Data<VoucherFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let query = VoucherQuery::parse(req.query_string());
    info!("💻️ GET {} ({query})", req.path());
    let cart_amount = query.cart_amount();
    if cart_amount.is_none() {
        debug!("💻️ cartAmount {:?} is not a number. Passing it on as null.", query.cart_amount);
    }
    let result = api.use_vouchers(cart_amount, query.vouchers).await?;
    Ok(HttpResponse::Ok().json(result))
}
