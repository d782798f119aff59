//! Templates that ship inside the binary.
//!
//! [`all`] lists every `(name, source)` pair; the built-in recipe refers to
//! templates by these names. A user template directory can shadow any of
//! them (see [`DirectoryStore`](crate::template_store::DirectoryStore)).
//!
//! Placeholders use `{{key}}`. Keys come from
//! [`Recipe::context`](crate::recipe::Recipe::context).

/// Every built-in template, sorted by name.
pub fn all() -> &'static [(&'static str, &'static str)] {
    TEMPLATES
}

const TEMPLATES: &[(&str, &str)] = &[
    ("Gemfile", GEMFILE),
    ("Procfile", PROCFILE),
    ("README.md", README),
    ("api_application_controller.rb", API_APPLICATION_CONTROLLER),
    ("api_constraints.rb", API_CONSTRAINTS),
    ("api_defaults_concern.rb", API_DEFAULTS_CONCERN),
    ("carrierwave.rb", CARRIERWAVE),
    ("config_ping.json.jbuilder", CONFIG_PING),
    ("configs_controller.rb", CONFIGS_CONTROLLER),
    ("database.yml", DATABASE_YML),
    ("decorator.rb", DECORATOR),
    ("gitignore", GITIGNORE),
    ("layout.json.jbuilder", LAYOUT),
    ("multi_json.rb", MULTI_JSON),
    ("puma.rb", PUMA),
    ("redis.rb", REDIS),
    ("resque.rake", RESQUE_RAKE),
    ("resque.rb", RESQUE),
    ("routes.rb", ROUTES),
    ("secrets.yml", SECRETS),
    ("sidekiq.rb", SIDEKIQ),
    ("test_job.rb", TEST_JOB),
];

const README: &str = r#"# {{app_name}}

## Getting started

    bundle install
    bin/rake db:setup
    foreman start

## Stack

* Ruby {{ruby_version}}
* PostgreSQL
* Puma
"#;

// Job gems may be empty, which leaves blank-line runs the recipe collapses.
const GEMFILE: &str = r#"source 'https://rubygems.org'

ruby '{{ruby_version}}'

gem 'rails', '4.2.4'
gem 'pg'
gem 'puma'
gem 'jbuilder'
gem 'oj'
gem 'oj_mimic_json'
gem 'carrierwave'
gem 'draper'


{{job_gems}}


group :development, :test do
  gem 'byebug'
  gem 'dotenv-rails'
  gem 'factory_girl_rails'
end


group :test do
  gem 'minitest-reporters'
  gem 'mocha'
end
"#;

const GITIGNORE: &str = r#"/.bundle
/log/*
!/log/.keep
/tmp
/public/uploads
/coverage
.env
.DS_Store
"#;

const DECORATOR: &str = r#"class {{app_const}}Decorator < Draper::Decorator
  delegate_all
end
"#;

const DATABASE_YML: &str = r#"default: &default
  adapter: postgresql
  encoding: unicode
  pool: <%= ENV.fetch('DB_POOL', 5) %>

development:
  <<: *default
  database: {{app_name_underscored}}_development

test:
  <<: *default
  database: {{app_name_underscored}}_test

staging:
  <<: *default
  url: <%= ENV['DATABASE_URL'] %>

production:
  <<: *default
  url: <%= ENV['DATABASE_URL'] %>
"#;

const ROUTES: &str = r#"require 'api_constraints'

Rails.application.routes.draw do
  namespace :api, defaults: { format: :json } do
    scope module: :v1, constraints: ApiConstraints.new(version: 1, default: true) do
      get 'ping', to: 'configs#ping'
    end
  end
end
"#;

const MULTI_JSON: &str = r#"MultiJson.use :oj
"#;

const API_CONSTRAINTS: &str = r#"class ApiConstraints
  def initialize(options)
    @version = options[:version]
    @default = options[:default]
  end

  def matches?(req)
    @default || req.headers['Accept'].include?("application/vnd.{{app_name_parameterized}}.v#{@version}")
  end
end
"#;

const API_APPLICATION_CONTROLLER: &str = r#"module Api
  module V1
    class ApplicationController < ActionController::Base
      include ApiDefaults

      protect_from_forgery with: :null_session
      layout 'api/v1/application'
    end
  end
end
"#;

const API_DEFAULTS_CONCERN: &str = r#"module ApiDefaults
  extend ActiveSupport::Concern

  included do
    before_action :set_default_format
  end

  private

  def set_default_format
    request.format = :json
  end
end
"#;

const CONFIGS_CONTROLLER: &str = r#"module Api
  module V1
    class ConfigsController < ApplicationController
      def ping
      end
    end
  end
end
"#;

const CONFIG_PING: &str = r#"json.message 'pong'
"#;

const LAYOUT: &str = r#"json.data JSON.parse(yield)
"#;

const SECRETS: &str = r#"development:
  secret_key_base: <%= ENV['SECRET_KEY_BASE'] %>

test:
  secret_key_base: <%= ENV['SECRET_KEY_BASE'] %>

staging:
  secret_key_base: <%= ENV['SECRET_KEY_BASE'] %>

production:
  secret_key_base: <%= ENV['SECRET_KEY_BASE'] %>
"#;

const REDIS: &str = r#"$redis = Redis::Namespace.new('{{app_name_underscored}}', redis: Redis.new(url: ENV['REDIS_URL']))
"#;

const RESQUE: &str = r#"Resque.redis = $redis
"#;

const SIDEKIQ: &str = r#"Sidekiq.configure_server do |config|
  config.redis = { url: ENV['REDIS_URL'], namespace: '{{app_name_underscored}}' }
end

Sidekiq.configure_client do |config|
  config.redis = { url: ENV['REDIS_URL'], namespace: '{{app_name_underscored}}' }
end
"#;

const TEST_JOB: &str = r#"class TestJob < ActiveJob::Base
  queue_as :default

  def perform(*args)
    Rails.logger.info "TestJob performed with #{args.inspect}"
  end
end
"#;

const RESQUE_RAKE: &str = r#"require 'resque/tasks'

task 'resque:setup' => :environment
"#;

const CARRIERWAVE: &str = r#"CarrierWave.configure do |config|
  config.root = Rails.root.join('public')
  config.cache_dir = Rails.root.join('tmp', 'uploads')
end
"#;

const PROCFILE: &str = r#"web: bundle exec puma -C config/puma.rb
"#;

const PUMA: &str = r#"workers Integer(ENV['WEB_CONCURRENCY'] || 2)
threads_count = Integer(ENV['MAX_THREADS'] || 5)
threads threads_count, threads_count

preload_app!

rackup      DefaultRackup
port        ENV['PORT']     || 3000
environment ENV['RACK_ENV'] || 'development'

on_worker_boot do
  ActiveRecord::Base.establish_connection
end
"#;
