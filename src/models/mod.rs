pub mod article;
pub mod cart;
pub mod order;
pub mod role;
pub mod user;

pub use article::{Article, ArticleForm, ArticleSort, ArticleUpdate, CatalogQuery};
pub use cart::{Cart, CartItem, CartView, QuantityForm};
pub use order::{NewOrderPayload, Order, OrderLine, OrderStatus, OrdersQuery, OrdersSubmission, StatusForm};
pub use role::Role;
pub use user::{CreateUserForm, LoginForm, ProfileForm, PublicUser, RegisterForm, UpdateUserForm, User};
